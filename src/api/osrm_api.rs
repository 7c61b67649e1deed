use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, trace, warn};

use super::{build_client, RouteProvider};
use crate::config::Config;
use crate::domain::types::{GeoPoint, PathResult};
use crate::error::{Error, Result};
use crate::utils::preview;

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<(f64, f64)>,
}

/// Road routing through an OSRM `route` service.
#[derive(Debug, Clone)]
pub struct OsrmRouteProvider {
    client: Client,
    base_url: String,
}

impl OsrmRouteProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        OsrmRouteProvider {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(build_client(config)?, config.osrm_base_url.clone()))
    }

    fn route_url(&self, points: &[GeoPoint]) -> String {
        // OSRM wants longitude,latitude in that order
        let coord_str = points
            .iter()
            .map(|p| format!("{},{}", p.longitude(), p.latitude()))
            .collect::<Vec<String>>()
            .join(";");
        format!("{}/route/v1/driving/{}", self.base_url, coord_str)
    }
}

#[async_trait]
impl RouteProvider for OsrmRouteProvider {
    async fn get_route(&self, ordered_points: &[GeoPoint]) -> Result<PathResult> {
        if ordered_points.len() < 2 {
            return Err(Error::invalid_input(format!(
                "a route needs at least two waypoints, got {}",
                ordered_points.len()
            )));
        }

        let url = self.route_url(ordered_points);
        trace!("Built OSRM URL: {} ({} chars)", url, url.len());
        info!("Requesting OSRM route over {} waypoints", ordered_points.len());

        let response = match self
            .client
            .get(&url)
            .query(&[("geometries", "geojson"), ("overview", "full"), ("steps", "false")])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                error!("OSRM request failed: {} ({} waypoints)", e, ordered_points.len());
                return Err(Error::provider_unavailable(format!("OSRM request failed: {}", e)));
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read OSRM response body: {}", e);
            Error::provider_unavailable(format!("failed to read OSRM response: {}", e))
        })?;
        debug!("Received OSRM response: HTTP {} ({} bytes)", status, text.len());

        let parsed = serde_json::from_str::<OsrmRouteResponse>(&text);

        // OSRM reports an unroutable request as a 400 with code "NoRoute".
        if let Ok(body) = &parsed {
            if body.code.as_deref() == Some("NoRoute") {
                warn!("OSRM found no route: {}", body.message.as_deref().unwrap_or(""));
                return Err(Error::NoRouteFound);
            }
        }

        if !status.is_success() {
            error!(
                "OSRM returned HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(Error::provider_unavailable(format!("OSRM returned HTTP {}", status)));
        }

        let body = parsed.map_err(|e| {
            error!(
                "Failed to parse OSRM JSON: {} (first 200 chars: {})",
                e,
                preview(&text, 200)
            );
            Error::provider_unavailable(format!("malformed OSRM response: {}", e))
        })?;

        if let Some(code) = body.code.as_deref() {
            if code != "Ok" {
                error!("OSRM responded with code {}", code);
                return Err(Error::provider_unavailable(format!(
                    "OSRM responded with code {}: {}",
                    code,
                    body.message.as_deref().unwrap_or("no message")
                )));
            }
        }

        let Some(route) = body.routes.into_iter().next() else {
            warn!("OSRM response contained no routes");
            return Err(Error::NoRouteFound);
        };

        info!(
            "OSRM route: {:.0} m, {:.0} s, {} geometry points",
            route.distance,
            route.duration,
            route.geometry.coordinates.len()
        );
        Ok(PathResult {
            geometry: route.geometry.coordinates,
            distance_meters: route.distance,
            duration_seconds: route.duration,
        })
    }
}

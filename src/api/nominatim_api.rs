use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, trace, warn};

use super::{build_client, GeocodeHit, Geocoder, ReverseHit};
use crate::config::constant::GEOCODE_RESULT_LIMIT;
use crate::config::{Config, RegionBias};
use crate::domain::types::GeoPoint;
use crate::error::{Error, Result};
use crate::utils::preview;

#[derive(Debug, Deserialize)]
struct SearchItem {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    importance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

/// Geocoding through an OpenStreetMap Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    region: Option<RegionBias>,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>, region: Option<RegionBias>) -> Self {
        NominatimGeocoder {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            region,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            build_client(config)?,
            config.nominatim_base_url.clone(),
            config.region.clone(),
        ))
    }

    /// Query text and extra parameters for a forward search.
    fn search_params(&self, address: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("format", "json".to_string()),
            ("limit", GEOCODE_RESULT_LIMIT.to_string()),
            ("addressdetails", "1".to_string()),
        ];

        match &self.region {
            Some(region) => {
                let query = if address.contains(&region.country_name) {
                    address.to_string()
                } else {
                    format!("{}, {}", address, region.country_name)
                };
                params.push(("q", query));
                params.push(("countrycodes", region.country_code.clone()));
                params.push(("bounded", "1".to_string()));
                params.push(("viewbox", region.viewbox.clone()));
            }
            None => params.push(("q", address.to_string())),
        }
        params
    }

    async fn fetch_text(&self, url: &str, params: &[(&str, String)], what: &str) -> Result<String> {
        trace!("Sending GET to {} ({})", url, what);
        let response = self.client.get(url).query(params).send().await.map_err(|e| {
            error!("Nominatim {} request failed: {}", what, e);
            Error::provider_unavailable(format!("Nominatim {} request failed: {}", what, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Nominatim {} returned HTTP {}", what, status);
            return Err(Error::provider_unavailable(format!(
                "Nominatim {} returned HTTP {}",
                what, status
            )));
        }

        response.text().await.map_err(|e| {
            error!("Failed to read Nominatim response body: {}", e);
            Error::provider_unavailable(format!("failed to read Nominatim response: {}", e))
        })
    }
}

fn parse_coord(raw: &str, field: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        Error::provider_unavailable(format!("Nominatim returned non-numeric {} '{}'", field, raw))
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn forward(&self, address: &str) -> Result<Vec<GeocodeHit>> {
        let url = format!("{}/search", self.base_url);
        let params = self.search_params(address);
        let text = self.fetch_text(&url, &params, "search").await?;

        let items: Vec<SearchItem> = serde_json::from_str(&text).map_err(|e| {
            error!("JSON parse error: {} (raw: {})", e, preview(&text, 200));
            Error::provider_unavailable(format!("malformed Nominatim search response: {}", e))
        })?;

        let hits = items
            .into_iter()
            .map(|item| -> Result<GeocodeHit> {
                Ok(GeocodeHit {
                    lat: parse_coord(&item.lat, "lat")?,
                    lng: parse_coord(&item.lon, "lon")?,
                    display_name: item.display_name,
                    importance: item.importance.unwrap_or(0.0),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Geocoded '{}' to {} candidates", address, hits.len());
        Ok(hits)
    }

    async fn reverse(&self, lat: f64, lng: f64) -> Result<ReverseHit> {
        let url = format!("{}/reverse", self.base_url);
        let params = [
            ("format", "json".to_string()),
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
            ("zoom", "16".to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", "en".to_string()),
        ];
        let text = self.fetch_text(&url, &params, "reverse").await?;

        let body: ReverseResponse = serde_json::from_str(&text).map_err(|e| {
            error!("JSON parse error: {} (raw: {})", e, preview(&text, 200));
            Error::provider_unavailable(format!("malformed Nominatim reverse response: {}", e))
        })?;

        match (body.display_name, body.error) {
            (Some(display_name), _) => Ok(ReverseHit {
                lat,
                lng,
                display_name,
            }),
            (None, err) => {
                warn!(
                    "Reverse geocoding ({}, {}) found nothing: {}",
                    lat,
                    lng,
                    err.as_deref().unwrap_or("empty response")
                );
                Err(Error::AddressNotFound(format!("{}, {}", lat, lng)))
            }
        }
    }
}

/// Geocode `(id, address)` pairs concurrently, keeping input order.
///
/// Each stop takes its top-ranked hit, labelled with the display name. At most
/// `concurrency` requests are in flight; the first failure aborts the batch.
pub async fn geocode_stops<G>(
    geocoder: &G,
    requests: &[(String, String)],
    concurrency: usize,
) -> Result<Vec<GeoPoint>>
where
    G: Geocoder + ?Sized,
{
    info!(
        "Geocoding {} addresses ({} concurrent)",
        requests.len(),
        concurrency.max(1)
    );

    stream::iter(requests.iter())
        .map(|(id, address)| async move {
            let hits = geocoder.forward(address).await?;
            let Some(top) = hits.into_iter().next() else {
                warn!("No results found for address: {}", address);
                return Err(Error::AddressNotFound(address.clone()));
            };
            let point = GeoPoint::new(id.clone(), top.lat, top.lng).with_label(top.display_name);
            point.validate()?;
            Ok::<GeoPoint, Error>(point)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

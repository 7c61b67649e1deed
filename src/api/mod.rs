pub mod nominatim_api;
pub mod osrm_api;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::types::{GeoPoint, PathResult};
use crate::error::{Error, Result};

pub use nominatim_api::{geocode_stops, NominatimGeocoder};
pub use osrm_api::OsrmRouteProvider;

/// Supplies road-network geometry, distance and duration for an ordered waypoint list.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Fails with `NoRouteFound` when the provider answers without a usable path,
    /// `ProviderUnavailable` on transport or service failure.
    async fn get_route(&self, ordered_points: &[GeoPoint]) -> Result<PathResult>;
}

/// One candidate match for a free-text address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeHit {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseHit {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

/// Resolves addresses to coordinates and back. Used upstream of the optimizer.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, address: &str) -> Result<Vec<GeocodeHit>>;
    async fn reverse(&self, lat: f64, lng: f64) -> Result<ReverseHit>;
}

/// Shared HTTP client carrying the configured user agent and timeout.
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))
}

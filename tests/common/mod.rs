use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ecoroute::{Error, GeoPoint, PathResult, Result, RouteProvider};

/// Deterministic provider: straight legs at 1.25x the great-circle length, 40 km/h.
#[allow(dead_code)]
#[derive(Default)]
pub struct StubRouteProvider {
    pub calls: AtomicUsize,
    pub last_request: Mutex<Vec<String>>,
}

#[async_trait]
impl RouteProvider for StubRouteProvider {
    async fn get_route(&self, ordered_points: &[GeoPoint]) -> Result<PathResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() =
            ordered_points.iter().map(|p| p.id().to_string()).collect();

        let mut km = 0.0;
        for pair in ordered_points.windows(2) {
            km += ecoroute::distance::distance_km(&pair[0], &pair[1])?;
        }
        let distance_meters = km * 1.25 * 1000.0;
        Ok(PathResult {
            geometry: ordered_points
                .iter()
                .map(|p| (p.longitude(), p.latitude()))
                .collect(),
            distance_meters,
            duration_seconds: distance_meters / 1000.0 / 40.0 * 3600.0,
        })
    }
}

/// Provider that always fails the same way.
#[allow(dead_code)]
pub enum FailingRouteProvider {
    NoRoute,
    Unavailable,
}

#[async_trait]
impl RouteProvider for FailingRouteProvider {
    async fn get_route(&self, _ordered_points: &[GeoPoint]) -> Result<PathResult> {
        match self {
            FailingRouteProvider::NoRoute => Err(Error::NoRouteFound),
            FailingRouteProvider::Unavailable => {
                Err(Error::ProviderUnavailable("connection refused".to_string()))
            }
        }
    }
}

#[allow(dead_code)]
pub fn delhi() -> GeoPoint {
    GeoPoint::new("origin", 28.6139, 77.2090)
}

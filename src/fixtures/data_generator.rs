use std::path::Path;

use csv::ReaderBuilder;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::constant::SEED;
use crate::domain::types::GeoPoint;
use crate::error::{Error, Result};

/// Connaught Place, New Delhi.
pub const DEFAULT_ORIGIN: (f64, f64) = (28.6139, 77.2090);

#[derive(Debug, Deserialize)]
struct StopRecord {
    id: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    label: Option<String>,
}

/// Reads `id,lat,lng[,label]` rows. The first row is the origin, the rest are stops.
pub fn read_points_from_csv(csv_path: impl AsRef<Path>) -> Result<(GeoPoint, Vec<GeoPoint>)> {
    let csv_path = csv_path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(csv_path)?;

    let mut points = Vec::new();
    for row in reader.deserialize::<StopRecord>() {
        let record = row?;
        let mut point = GeoPoint::new(record.id, record.lat, record.lng);
        if let Some(label) = record.label.filter(|l| !l.is_empty()) {
            point = point.with_label(label);
        }
        points.push(point);
    }

    if points.len() < 2 {
        return Err(Error::invalid_input(format!(
            "{} needs an origin row and at least one stop row, found {} rows",
            csv_path.display(),
            points.len()
        )));
    }

    let origin = points.remove(0);
    info!(
        "Loaded origin '{}' and {} stops from {}",
        origin.id(),
        points.len(),
        csv_path.display()
    );
    Ok((origin, points))
}

/// Scatter `count` stops uniformly within `radius_km` of `origin`, deterministically for `seed`.
pub fn generate_random_stops(
    origin: &GeoPoint,
    count: usize,
    radius_km: f64,
    seed: u64,
) -> Vec<GeoPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    // ~111 km per degree of latitude; longitude degrees shrink with cos(lat).
    let lat_span = radius_km / 111.0;
    let lng_span = radius_km / (111.0 * origin.latitude().to_radians().cos().max(0.01));

    (0..count)
        .map(|k| {
            let lat = (origin.latitude() + rng.gen_range(-lat_span..=lat_span)).clamp(-90.0, 90.0);
            let lng =
                (origin.longitude() + rng.gen_range(-lng_span..=lng_span)).clamp(-180.0, 180.0);
            GeoPoint::new(format!("stop-{:03}", k + 1), lat, lng)
        })
        .collect()
}

/// Origin and stops for the demo binary: from `csv_path` when given, otherwise generated.
pub fn load_points(csv_path: Option<&str>, fallback_count: usize) -> (GeoPoint, Vec<GeoPoint>) {
    if let Some(path) = csv_path {
        match read_points_from_csv(path) {
            Ok(points) => return points,
            Err(err) => warn!(
                "Failed to read stops CSV at {}: {}. Falling back to random generation.",
                path, err
            ),
        }
    }

    let origin = GeoPoint::new("origin", DEFAULT_ORIGIN.0, DEFAULT_ORIGIN.1).with_label("Connaught Place");
    let stops = generate_random_stops(&origin, fallback_count, 15.0, SEED);
    info!("Generated {} random stops around '{}'", stops.len(), origin.id());
    (origin, stops)
}

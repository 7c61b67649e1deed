use rayon::prelude::*;
use tracing::debug;

use super::haversine::haversine_km;
use crate::domain::types::GeoPoint;
use crate::error::Result;

/// Symmetric great-circle distances over origin + stops. Index 0 is the origin,
/// stop `k` of the input slice sits at index `k + 1`.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Validates every point, then fills the matrix row by row in parallel.
    pub fn build(origin: &GeoPoint, stops: &[GeoPoint]) -> Result<Self> {
        origin.validate()?;
        for stop in stops {
            stop.validate()?;
        }

        let coords: Vec<(f64, f64)> = std::iter::once(origin)
            .chain(stops.iter())
            .map(|p| (p.latitude(), p.longitude()))
            .collect();
        let size = coords.len();

        // Upper triangle only; the lower half is mirrored so symmetry is exact.
        let upper: Vec<Vec<f64>> = (0..size)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..size)
                    .map(|j| haversine_km(coords[i], coords[j]))
                    .collect()
            })
            .collect();

        let mut cells = vec![0.0; size * size];
        for (i, row) in upper.iter().enumerate() {
            for (offset, &d) in row.iter().enumerate() {
                let j = i + 1 + offset;
                cells[i * size + j] = d;
                cells[j * size + i] = d;
            }
        }

        debug!("Built {}x{} distance matrix", size, size);
        Ok(DistanceMatrix { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn between(&self, from: usize, to: usize) -> f64 {
        self.cells[from * self.size + to]
    }

    /// Distance from the origin to stop `stop`.
    pub fn from_origin(&self, stop: usize) -> f64 {
        self.between(0, stop + 1)
    }

    /// Distance between stops `a` and `b` (stop-slice indices).
    pub fn between_stops(&self, a: usize, b: usize) -> f64 {
        self.between(a + 1, b + 1)
    }
}

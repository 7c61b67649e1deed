use itertools::Itertools;

use crate::distance::DistanceMatrix;
use crate::domain::types::{GeoPoint, OptimizationSettings, PriorityClass};
use crate::error::Result;

/// Unweighted open-path length: origin, then each stop in `order`. No return leg.
pub fn path_length(order: &[usize], dm: &DistanceMatrix) -> f64 {
    let Some(&first) = order.first() else {
        return 0.0;
    };

    let mut total = dm.from_origin(first);
    for (a, b) in order.iter().tuple_windows() {
        total += dm.between_stops(*a, *b);
    }
    total
}

/// Weighted tour cost compared by the refiner.
pub fn tour_score(order: &[usize], dm: &DistanceMatrix, priority: PriorityClass) -> f64 {
    path_length(order, dm) * priority.weight()
}

/// Score of `order` with positions `i..=j` reversed, without materialising the candidate.
/// Sums the same legs in the same sequence as `tour_score` on the reversed order.
pub(crate) fn reversed_score(
    order: &[usize],
    i: usize,
    j: usize,
    dm: &DistanceMatrix,
    priority: PriorityClass,
) -> f64 {
    let at = |k: usize| if k >= i && k <= j { order[i + j - k] } else { order[k] };

    let mut total = dm.from_origin(at(0));
    for k in 1..order.len() {
        total += dm.between_stops(at(k - 1), at(k));
    }
    total * priority.weight()
}

/// Score a tour given as points in visiting order (origin excluded).
pub fn score(
    origin: &GeoPoint,
    tour: &[GeoPoint],
    settings: &OptimizationSettings,
) -> Result<f64> {
    let dm = DistanceMatrix::build(origin, tour)?;
    let order: Vec<usize> = (0..tour.len()).collect();
    Ok(tour_score(&order, &dm, settings.priority_class))
}

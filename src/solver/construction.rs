use tracing::{debug, trace};

use crate::distance::DistanceMatrix;
use crate::domain::types::{GeoPoint, OptimizationSettings, PriorityClass, Tour};
use crate::error::{Error, Result};
use crate::evaluation::weights::weighted_distance;

/// Greedy nearest-neighbour order over `dm`'s stops, starting at the origin.
///
/// Each step takes the unvisited stop with the lowest weighted leg cost from the
/// current position. Ties go to the stop listed first in the input.
pub fn nearest_neighbour_order(dm: &DistanceMatrix, priority: PriorityClass) -> Vec<usize> {
    let stop_count = dm.size() - 1;
    let mut unvisited: Vec<usize> = (0..stop_count).collect();
    let mut order = Vec::with_capacity(stop_count);
    let mut current: Option<usize> = None;

    while !unvisited.is_empty() {
        let mut best_pos = 0;
        let mut best_cost = f64::INFINITY;

        for (pos, &stop) in unvisited.iter().enumerate() {
            let leg = match current {
                None => dm.from_origin(stop),
                Some(from) => dm.between_stops(from, stop),
            };
            let cost = weighted_distance(leg, priority);
            if cost < best_cost {
                best_cost = cost;
                best_pos = pos;
            }
        }

        let next = unvisited.remove(best_pos);
        trace!("Nearest neighbour picked stop {} (weighted cost {:.4})", next, best_cost);
        order.push(next);
        current = Some(next);
    }

    debug!("Nearest neighbour order: {:?}", order);
    order
}

/// Build the initial tour for `stops` from `origin`.
pub fn construct_tour(
    origin: &GeoPoint,
    stops: &[GeoPoint],
    settings: &OptimizationSettings,
) -> Result<Tour> {
    if stops.is_empty() {
        return Err(Error::invalid_input("at least one stop is required"));
    }
    let dm = DistanceMatrix::build(origin, stops)?;
    let order = nearest_neighbour_order(&dm, settings.priority_class);
    Ok(Tour::from_order(&order, stops))
}

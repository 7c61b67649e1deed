use std::collections::HashSet;

use tracing::{debug, error, info, span, Level};

use crate::api::RouteProvider;
use crate::distance::DistanceMatrix;
use crate::domain::types::{GeoPoint, OptimizationResult, OptimizationSettings, Tour, TourPlan};
use crate::error::{Error, Result};
use crate::evaluation::metrics::calculate_metrics;
use crate::solver::construction::nearest_neighbour_order;
use crate::solver::two_opt::{two_opt, RefineBudget};
use crate::utils::format_order;

/// Reject anything the kernel cannot plan before any provider is contacted.
fn validate_request(origin: &GeoPoint, stops: &[GeoPoint]) -> Result<()> {
    if stops.is_empty() {
        return Err(Error::invalid_input("at least one stop is required"));
    }
    if origin.id().is_empty() {
        return Err(Error::invalid_input("origin id must not be empty"));
    }

    let mut seen = HashSet::with_capacity(stops.len());
    for stop in stops {
        if stop.id().is_empty() {
            return Err(Error::invalid_input("stop ids must not be empty"));
        }
        if stop.id() == origin.id() {
            return Err(Error::invalid_input(format!(
                "stop '{}' reuses the origin id",
                stop.id()
            )));
        }
        if !seen.insert(stop.id()) {
            return Err(Error::invalid_input(format!(
                "stop id '{}' appears more than once",
                stop.id()
            )));
        }
    }
    Ok(())
}

/// Construct and refine a visiting order without touching any provider.
pub fn plan_tour(
    origin: &GeoPoint,
    stops: &[GeoPoint],
    settings: &OptimizationSettings,
    budget: &RefineBudget,
) -> Result<TourPlan> {
    validate_request(origin, stops)?;
    let dm = DistanceMatrix::build(origin, stops)?;

    let initial = {
        let span = span!(Level::DEBUG, "construct", stops = stops.len());
        let _g = span.enter();
        nearest_neighbour_order(&dm, settings.priority_class)
    };

    let outcome = two_opt(initial, &dm, settings.priority_class, budget);
    let tour = Tour::from_order(&outcome.order, stops);
    debug!("Planned tour: {}", format_order(tour.ids()));

    Ok(TourPlan {
        tour,
        order: outcome.order,
        stats: outcome.stats,
    })
}

/// Plan a tour, fetch its road path from `provider`, and derive metrics.
///
/// Provider failures are returned unchanged; nothing is retried here.
pub async fn optimize<P>(
    origin: &GeoPoint,
    stops: &[GeoPoint],
    settings: &OptimizationSettings,
    provider: &P,
    budget: &RefineBudget,
) -> Result<OptimizationResult>
where
    P: RouteProvider + ?Sized,
{
    info!(
        "Optimizing {} stops from '{}' ({} / {})",
        stops.len(),
        origin.id(),
        settings.vehicle_class,
        settings.priority_class
    );

    let plan = plan_tour(origin, stops, settings, budget)?;

    let waypoints: Vec<GeoPoint> = std::iter::once(origin.clone())
        .chain(plan.order.iter().map(|&ind| stops[ind].clone()))
        .collect();

    let path = match provider.get_route(&waypoints).await {
        Ok(path) => path,
        Err(e) => {
            error!("Route provider failed: {}", e);
            return Err(e);
        }
    };

    let metrics = calculate_metrics(&path, settings)?;
    info!(
        "Route ready: {:.1} km, {:.1} min, {:.2} kg CO2 saved",
        metrics.total_distance_km, metrics.total_time_min, metrics.co2_saved_kg
    );

    Ok(OptimizationResult {
        tour: plan.tour,
        waypoints,
        path,
        metrics,
        refinement: plan.stats,
    })
}

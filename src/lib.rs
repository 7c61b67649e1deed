//! Route optimization kernel: nearest-neighbour construction, 2-opt refinement
//! and fuel/CO2/cost metrics for a single-vehicle delivery run, with OSRM and
//! Nominatim adapters behind swappable traits.

pub mod api;
pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod logging;
pub mod runner;
pub mod solver;
pub mod utils;

pub use api::{Geocoder, RouteProvider};
pub use config::Config;
pub use domain::types::{
    GeoPoint, Metrics, OptimizationResult, OptimizationSettings, PathResult, PriorityClass,
    RefineStats, Tour, TourPlan, VehicleClass,
};
pub use error::{Error, Result};
pub use solver::{optimize, plan_tour, RefineBudget};

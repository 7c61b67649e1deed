pub mod fitness;
pub mod metrics;
pub mod weights;

pub use fitness::{score, tour_score};
pub use metrics::calculate_metrics;

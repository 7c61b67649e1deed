pub mod haversine;
pub mod matrix;

pub use haversine::distance_km;
pub use matrix::DistanceMatrix;

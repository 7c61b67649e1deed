pub mod data_generator;

pub use data_generator::{generate_random_stops, load_points, read_points_from_csv};

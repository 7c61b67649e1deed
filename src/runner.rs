use std::env;
use std::error::Error;

use chrono::Local;
use colored::*;
use csv::Writer;
use tracing::{info, span, Instrument, Level};

use crate::api::OsrmRouteProvider;
use crate::config::Config;
use crate::domain::types::{GeoPoint, OptimizationResult, OptimizationSettings, PriorityClass, VehicleClass};
use crate::fixtures::load_points;
use crate::logging;
use crate::solver::optimize;

const DEMO_STOP_COUNT: usize = 12;

/// Read vehicle and priority classes from the environment (defaults: Diesel / balanced).
fn settings_from_env() -> crate::error::Result<OptimizationSettings> {
    let vehicle_class = match env::var("VEHICLE_CLASS") {
        Ok(raw) => raw.parse::<VehicleClass>()?,
        Err(_) => VehicleClass::Diesel,
    };
    let priority_class = match env::var("PRIORITY_CLASS") {
        Ok(raw) => raw.parse::<PriorityClass>()?,
        Err(_) => PriorityClass::Balanced,
    };
    Ok(OptimizationSettings::new(vehicle_class, priority_class))
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    logging::init();
    let config = Config::from_env()?;
    let settings = settings_from_env()?;

    let stops_csv = env::var("STOPS_CSV").ok();
    let (origin, stops) = load_points(stops_csv.as_deref(), DEMO_STOP_COUNT);

    let provider = OsrmRouteProvider::from_config(&config)?;

    let span = span!(Level::INFO, "optimize", stops = stops.len());
    let result = optimize(&origin, &stops, &settings, &provider, &config.refine_budget)
        .instrument(span)
        .await?;

    print_summary(&result, &settings);

    let filename = format!("route_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
    save_to_csv(&result, &filename)?;
    info!("Wrote route report to {}", filename);

    Ok(())
}

fn print_summary(result: &OptimizationResult, settings: &OptimizationSettings) {
    let m = &result.metrics;
    println!(
        "{}",
        format!(
            "Optimized route ({} / {}): {} stops",
            settings.vehicle_class,
            settings.priority_class,
            result.tour.len()
        )
        .bold()
    );

    for (position, point) in result.waypoints.iter().enumerate() {
        println!("  {:>3}. {}", position, describe(point));
    }

    println!(
        "Distance: {:.1} km, Time: {:.1} min, Cost: {:.2}",
        m.total_distance_km, m.total_time_min, m.total_cost
    );
    println!(
        "Fuel used: {:.2} L, CO2: {:.2} kg",
        m.fuel_used_l, m.co2_emissions_kg
    );
    println!(
        "{}",
        format!(
            "Saved vs. unoptimized: {:.2} L fuel, {:.2} kg CO2",
            m.fuel_saved_l, m.co2_saved_kg
        )
        .green()
    );

    let refinement = format!(
        "2-opt: {} sweeps, {} swaps",
        result.refinement.sweeps, result.refinement.swaps
    );
    if result.refinement.converged {
        println!("{}", refinement);
    } else {
        println!("{}", format!("{} (budget exhausted, best found so far)", refinement).yellow());
    }
}

fn describe(point: &GeoPoint) -> String {
    match point.label() {
        Some(label) => format!(
            "{} ({:.5}, {:.5}) {}",
            point.id(),
            point.latitude(),
            point.longitude(),
            label
        ),
        None => format!("{} ({:.5}, {:.5})", point.id(), point.latitude(), point.longitude()),
    }
}

fn save_to_csv(result: &OptimizationResult, filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record(["position", "id", "lat", "lng", "label"])?;
    for (position, point) in result.waypoints.iter().enumerate() {
        wtr.write_record([
            position.to_string(),
            point.id().to_string(),
            point.latitude().to_string(),
            point.longitude().to_string(),
            point.label().unwrap_or("").to_string(),
        ])?;
    }

    let m = &result.metrics;
    wtr.write_record(["", "", "", "", ""])?;
    wtr.write_record(["metric", "value", "", "", ""])?;
    for (name, value) in [
        ("total_distance_km", m.total_distance_km),
        ("total_time_min", m.total_time_min),
        ("total_cost", m.total_cost),
        ("co2_emissions_kg", m.co2_emissions_kg),
        ("co2_saved_kg", m.co2_saved_kg),
        ("fuel_saved_l", m.fuel_saved_l),
        ("fuel_used_l", m.fuel_used_l),
    ] {
        wtr.write_record([name.to_string(), value.to_string(), String::new(), String::new(), String::new()])?;
    }

    wtr.flush()?;
    Ok(())
}

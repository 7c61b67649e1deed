use crate::domain::types::{Metrics, OptimizationSettings, PathResult, PriorityClass, VehicleClass};
use crate::error::{Error, Result};
use crate::utils::round_to;

/// Litres of fuel per km for the reference vehicle.
const BASE_FUEL_L_PER_KM: f64 = 0.08;
/// kg of CO2 per km for the reference vehicle.
const BASE_CO2_KG_PER_KM: f64 = 0.18;
/// Cost per km for the reference vehicle.
const BASE_COST_PER_KM: f64 = 0.15;

/// Fixed estimate of how much worse an unoptimized route would be.
const UNOPTIMIZED_FUEL_FACTOR: f64 = 1.3;
const UNOPTIMIZED_CO2_FACTOR: f64 = 1.25;

/// Fuel, CO2 and cost multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub fuel: f64,
    pub co2: f64,
    pub cost: f64,
}

impl VehicleClass {
    pub const fn multipliers(self) -> Multipliers {
        match self {
            VehicleClass::Ev => Multipliers { fuel: 0.0, co2: 0.05, cost: 0.05 },
            VehicleClass::Diesel => Multipliers { fuel: 0.9, co2: 0.9, cost: 1.0 },
            VehicleClass::Petrol => Multipliers { fuel: 1.0, co2: 1.0, cost: 1.1 },
        }
    }
}

impl PriorityClass {
    pub const fn multipliers(self) -> Multipliers {
        match self {
            PriorityClass::Green => Multipliers { fuel: 0.85, co2: 0.8, cost: 1.1 },
            PriorityClass::Balanced => Multipliers { fuel: 1.0, co2: 1.0, cost: 1.0 },
            PriorityClass::Fast => Multipliers { fuel: 1.2, co2: 1.15, cost: 1.3 },
            PriorityClass::Cheap => Multipliers { fuel: 0.95, co2: 1.05, cost: 0.85 },
        }
    }
}

/// Derive fuel, CO2 and cost figures for a travelled path.
pub fn calculate_metrics(path: &PathResult, settings: &OptimizationSettings) -> Result<Metrics> {
    if !path.distance_meters.is_finite() || path.distance_meters < 0.0 {
        return Err(Error::invalid_input(format!(
            "path distance must be a non-negative number of meters, got {}",
            path.distance_meters
        )));
    }
    if !path.duration_seconds.is_finite() || path.duration_seconds < 0.0 {
        return Err(Error::invalid_input(format!(
            "path duration must be a non-negative number of seconds, got {}",
            path.duration_seconds
        )));
    }

    let distance_km = path.distance_meters / 1000.0;
    let time_min = path.duration_seconds / 60.0;

    let base_fuel = distance_km * BASE_FUEL_L_PER_KM;
    let base_co2 = distance_km * BASE_CO2_KG_PER_KM;
    let base_cost = distance_km * BASE_COST_PER_KM;

    let vehicle = settings.vehicle_class.multipliers();
    let priority = settings.priority_class.multipliers();

    let fuel_used = base_fuel * vehicle.fuel * priority.fuel;
    let co2_emissions = base_co2 * vehicle.co2 * priority.co2;
    let total_cost = base_cost * vehicle.cost * priority.cost;

    let unoptimized_fuel = base_fuel * UNOPTIMIZED_FUEL_FACTOR;
    let unoptimized_co2 = base_co2 * UNOPTIMIZED_CO2_FACTOR;

    Ok(Metrics {
        total_distance_km: round_to(distance_km, 1),
        total_time_min: round_to(time_min, 1),
        total_cost: round_to(total_cost, 2),
        co2_emissions_kg: round_to(co2_emissions, 2),
        co2_saved_kg: round_to(unoptimized_co2 - co2_emissions, 2),
        fuel_saved_l: round_to(unoptimized_fuel - fuel_used, 2),
        fuel_used_l: round_to(fuel_used, 2),
    })
}

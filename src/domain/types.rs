use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point on the map. Identity is `id`; coordinates are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    id: String,
    latitude: f64,
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl GeoPoint {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            id: id.into(),
            latitude,
            longitude,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Rejects non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(Error::invalid_input(format!(
                "point '{}' has non-finite coordinates ({}, {})",
                self.id, self.latitude, self.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::invalid_input(format!(
                "point '{}' latitude {} is outside [-90, 90]",
                self.id, self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::invalid_input(format!(
                "point '{}' longitude {} is outside [-180, 180]",
                self.id, self.longitude
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    #[serde(rename = "EV")]
    Ev,
    Diesel,
    Petrol,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Ev, VehicleClass::Diesel, VehicleClass::Petrol];
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleClass::Ev => "EV",
            VehicleClass::Diesel => "Diesel",
            VehicleClass::Petrol => "Petrol",
        };
        f.write_str(name)
    }
}

impl FromStr for VehicleClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "EV" | "ev" => Ok(VehicleClass::Ev),
            "Diesel" | "diesel" => Ok(VehicleClass::Diesel),
            "Petrol" | "petrol" => Ok(VehicleClass::Petrol),
            other => Err(Error::invalid_input(format!("unknown vehicle class '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    Green,
    Balanced,
    Fast,
    Cheap,
}

impl PriorityClass {
    pub const ALL: [PriorityClass; 4] = [
        PriorityClass::Green,
        PriorityClass::Balanced,
        PriorityClass::Fast,
        PriorityClass::Cheap,
    ];
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityClass::Green => "green",
            PriorityClass::Balanced => "balanced",
            PriorityClass::Fast => "fast",
            PriorityClass::Cheap => "cheap",
        };
        f.write_str(name)
    }
}

impl FromStr for PriorityClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(PriorityClass::Green),
            "balanced" => Ok(PriorityClass::Balanced),
            "fast" => Ok(PriorityClass::Fast),
            "cheap" => Ok(PriorityClass::Cheap),
            other => Err(Error::invalid_input(format!("unknown priority class '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSettings {
    pub vehicle_class: VehicleClass,
    pub priority_class: PriorityClass,
}

impl OptimizationSettings {
    pub fn new(vehicle_class: VehicleClass, priority_class: PriorityClass) -> Self {
        OptimizationSettings {
            vehicle_class,
            priority_class,
        }
    }
}

/// Visiting order of stop ids. The origin is implicit at position 0 and never listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour(Vec<String>);

impl Tour {
    pub(crate) fn from_order(order: &[usize], stops: &[GeoPoint]) -> Self {
        Tour(order.iter().map(|&ind| stops[ind].id().to_string()).collect())
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Road-network path returned by a route provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    /// `(lng, lat)` pairs in travel order.
    pub geometry: Vec<(f64, f64)>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_distance_km: f64,
    pub total_time_min: f64,
    pub total_cost: f64,
    pub co2_emissions_kg: f64,
    pub co2_saved_kg: f64,
    pub fuel_saved_l: f64,
    pub fuel_used_l: f64,
}

/// How the 2-opt pass ended. `converged == false` means the budget ran out first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefineStats {
    pub sweeps: usize,
    pub swaps: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPlan {
    pub tour: Tour,
    /// Indices into the caller's stop slice, in visiting order.
    #[serde(skip)]
    pub order: Vec<usize>,
    pub stats: RefineStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub tour: Tour,
    pub waypoints: Vec<GeoPoint>,
    pub path: PathResult,
    pub metrics: Metrics,
    pub refinement: RefineStats,
}

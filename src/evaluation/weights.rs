use crate::domain::types::PriorityClass;

impl PriorityClass {
    /// Cost multiplier applied to a travelled distance when comparing tours.
    ///
    /// The weight is a per-class constant and does not scale with the distance it
    /// multiplies. A distance-sensitive weighting was probably the intent of the
    /// original product design, but changing it needs product direction: with a
    /// constant positive weight the priority class cannot change which tour wins.
    pub const fn weight(self) -> f64 {
        match self {
            PriorityClass::Fast => 0.7,
            PriorityClass::Green => 0.8,
            PriorityClass::Balanced => 1.0,
            PriorityClass::Cheap => 1.2,
        }
    }
}

/// Weighted leg cost used by the nearest-neighbour step.
pub fn weighted_distance(distance_km: f64, priority: PriorityClass) -> f64 {
    distance_km * priority.weight()
}

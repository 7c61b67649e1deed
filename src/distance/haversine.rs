use crate::config::constant::EARTH_RADIUS_KM;
use crate::domain::types::GeoPoint;
use crate::error::Result;

/// Great-circle distance in kilometres between two validated points.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> Result<f64> {
    a.validate()?;
    b.validate()?;
    Ok(haversine_km(
        (a.latitude(), a.longitude()),
        (b.latitude(), b.longitude()),
    ))
}

/// Unchecked haversine over `(lat, lng)` pairs in degrees.
pub(crate) fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let d_lat = (to.0 - from.0).to_radians();
    let d_lng = (to.1 - from.1).to_radians();
    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + from.0.to_radians().cos()
            * to.0.to_radians().cos()
            * (d_lng / 2.0).sin()
            * (d_lng / 2.0).sin();
    // rounding can push antipodal pairs just past 1
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

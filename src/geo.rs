use serde::{Deserialize, Serialize};

/// A WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (Haversine).
/// No input validation: NaN coordinates propagate NaN.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Two-decimal rounding used when persisting offer distances.
pub fn round2(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Rough travel estimate used to pre-fill the flash card's ETA field,
/// at ~3 minutes per kilometer, never less than one minute.
pub fn eta_minutes(distance_km: f64) -> i64 {
    ((distance_km * 3.0).ceil() as i64).max(1)
}

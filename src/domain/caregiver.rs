use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Caregiver profile, read-only from this subsystem's perspective.
///
/// Used to gate feed visibility (radius filter) and to pre-fill the offer
/// price. The last known position is written by an out-of-scope presence
/// ping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverProfile {
    pub id: String,
    pub display_name: String,
    pub city: String,
    pub service_codes: Vec<String>,
    pub radius_km: Option<f64>,
    pub default_fee: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CaregiverProfile {
    pub fn position(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

use thiserror::Error;

use crate::db::{caregivers, Database};
use crate::geo::Coordinate;

/// Typed geolocation failures, mirroring the device API's outcomes.
/// All of them are non-fatal to the offer flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("location permission denied")]
    Denied,
    #[error("position unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

/// Best-effort source of the caregiver's current position.
pub trait Locator {
    fn locate(&self) -> Result<Coordinate, GeoError>;
}

/// Production locator: the last known position stored on the caregiver
/// profile (written by the presence ping, out of scope here). A missing
/// or incomplete position reads as `Unavailable`.
pub struct ProfileLocator<'a> {
    db: &'a Database,
    caregiver_id: &'a str,
}

impl<'a> ProfileLocator<'a> {
    pub fn new(db: &'a Database, caregiver_id: &'a str) -> Self {
        Self { db, caregiver_id }
    }
}

impl Locator for ProfileLocator<'_> {
    fn locate(&self) -> Result<Coordinate, GeoError> {
        let profile = self
            .db
            .with_conn(|conn| caregivers::get_profile(conn, self.caregiver_id))
            .map_err(|_| GeoError::Unavailable)?;

        profile
            .and_then(|p| p.position())
            .ok_or(GeoError::Unavailable)
    }
}

/// Fixed-position locator for tests and seeding.
pub struct FixedLocator(pub Coordinate);

impl Locator for FixedLocator {
    fn locate(&self) -> Result<Coordinate, GeoError> {
        Ok(self.0)
    }
}

/// Always-failing locator for tests.
pub struct FailingLocator(pub GeoError);

impl Locator for FailingLocator {
    fn locate(&self) -> Result<Coordinate, GeoError> {
        Err(self.0)
    }
}

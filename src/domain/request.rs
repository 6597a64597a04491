use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A patient's emergency home-care request.
///
/// Created by the patient-facing flow; the caregiver feed only reads it.
/// `status` is `Live` for exactly the window during which offers may be
/// submitted — any transition away means "no longer actionable".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyRequest {
    pub id: String,
    pub patient_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub service_codes: Vec<String>,
    pub urgency: Urgency,
    pub offered_price: Option<i64>,
    pub notes: Option<String>,
    pub status: RequestStatus,
    pub created_at: i64,
}

impl EmergencyRequest {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Live,
    Matched,
    Cancelled,
    Expired,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Live => "live",
            RequestStatus::Matched => "matched",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "live" => Some(RequestStatus::Live),
            "matched" => Some(RequestStatus::Matched),
            "cancelled" => Some(RequestStatus::Cancelled),
            "expired" => Some(RequestStatus::Expired),
            _ => None,
        }
    }
}

impl FromSql for RequestStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown status: {s}").into()))
    }
}

impl ToSql for RequestStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    Within1Hour,
    Scheduled,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::Within1Hour => "within_1_hour",
            Urgency::Scheduled => "scheduled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Urgency::Critical),
            "within_1_hour" => Some(Urgency::Within1Hour),
            "scheduled" => Some(Urgency::Scheduled),
            _ => None,
        }
    }

    /// Short label for the feed badge.
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Critical => "Critical",
            Urgency::Within1Hour => "Within 1 hour",
            Urgency::Scheduled => "Scheduled",
        }
    }
}

impl FromSql for Urgency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown urgency: {s}").into()))
    }
}

impl ToSql for Urgency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

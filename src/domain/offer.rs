use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

/// A caregiver's counter-offer against a live request.
///
/// Never updated or deleted by the caregiver-facing code; acceptance and
/// rejection happen in the patient-facing flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverOffer {
    pub id: String,
    pub request_id: String,
    pub caregiver_id: String,
    pub price: i64,
    pub eta_minutes: i64,
    pub message: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_km: Option<f64>,
    pub status: OfferStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OfferStatus::Pending),
            "accepted" => Some(OfferStatus::Accepted),
            "rejected" => Some(OfferStatus::Rejected),
            _ => None,
        }
    }
}

impl FromSql for OfferStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown offer status: {s}").into()))
    }
}

impl ToSql for OfferStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

/// Raw caregiver input for an offer, before validation.
///
/// Price and ETA come straight from form fields, so they are kept as
/// strings here; `validate` is the single gate in front of the store.
#[derive(Debug, Clone, Default)]
pub struct OfferDraft {
    pub request_id: String,
    pub price: String,
    pub eta_minutes: String,
    pub message: Option<String>,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidOffer {
    pub request_id: String,
    pub price: i64,
    pub eta_minutes: i64,
    pub message: Option<String>,
}

impl OfferDraft {
    /// Both price and ETA must be present, numeric, and positive.
    /// Anything else blocks submission before any storage access.
    pub fn validate(&self) -> Result<ValidOffer, ServerError> {
        if self.request_id.trim().is_empty() {
            return Err(ServerError::Validation("missing request".into()));
        }

        let price = parse_positive(&self.price, "price")?;
        let eta_minutes = parse_positive(&self.eta_minutes, "ETA")?;

        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(ValidOffer {
            request_id: self.request_id.trim().to_string(),
            price,
            eta_minutes,
            message,
        })
    }
}

fn parse_positive(raw: &str, field: &str) -> Result<i64, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ServerError::Validation(format!("{field} is required")));
    }
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ServerError::Validation(format!(
            "{field} must be a positive number"
        ))),
    }
}

pub mod caregivers;
pub mod connection;
pub mod offers;
pub mod requests;

pub use connection::{init_db, Database};

/// Service-code sets are stored as JSON arrays in a TEXT column.
pub(crate) fn codes_to_json(codes: &[String]) -> String {
    serde_json::to_string(codes).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn codes_from_json(
    idx: usize,
    raw: &str,
) -> Result<Vec<String>, rusqlite::Error> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

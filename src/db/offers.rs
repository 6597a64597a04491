use std::collections::HashSet;

use rusqlite::{params, Connection};

use crate::domain::CaregiverOffer;
use crate::errors::ServerError;

/// Persist an offer. A UNIQUE(request_id, caregiver_id) violation is the
/// storage-level form of "this caregiver already offered on this request"
/// and comes back as `ServerError::DuplicateOffer`; everything else is a
/// generic `DbError`.
pub fn insert_offer(conn: &Connection, offer: &CaregiverOffer) -> Result<(), ServerError> {
    conn.execute(
        "insert into offers (
            id, request_id, caregiver_id,
            price, eta_minutes, message,
            latitude, longitude, distance_km,
            status, created_at
         ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            offer.id,
            offer.request_id,
            offer.caregiver_id,
            offer.price,
            offer.eta_minutes,
            offer.message,
            offer.latitude,
            offer.longitude,
            offer.distance_km,
            offer.status,
            offer.created_at,
        ],
    )
    .map_err(classify_insert_error)?;
    Ok(())
}

fn classify_insert_error(e: rusqlite::Error) -> ServerError {
    if let rusqlite::Error::SqliteFailure(f, _) = &e {
        if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return ServerError::DuplicateOffer;
        }
    }
    ServerError::DbError(format!("insert offer failed: {e}"))
}

/// Request ids this caregiver has already offered on, used to render
/// "Offer sent" instead of the action button.
pub fn offered_request_ids(
    conn: &Connection,
    caregiver_id: &str,
) -> Result<HashSet<String>, ServerError> {
    let mut stmt = conn
        .prepare("select request_id from offers where caregiver_id = ?")
        .map_err(|e| ServerError::DbError(format!("prepare offered ids failed: {e}")))?;

    let rows = stmt
        .query_map(params![caregiver_id], |row| row.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(format!("query offered ids failed: {e}")))?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r.map_err(|e| ServerError::DbError(format!("read offered id failed: {e}")))?);
    }
    Ok(out)
}

pub fn count_for_request(conn: &Connection, request_id: &str) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*) from offers where request_id = ?",
        params![request_id],
        |row| row.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count offers failed: {e}")))
}

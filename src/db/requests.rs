use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{codes_from_json, codes_to_json};
use crate::domain::{EmergencyRequest, RequestStatus};
use crate::errors::ServerError;

const SQL_LIVE_REQUESTS: &str = include_str!("../../sql/live_requests.sql");

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<EmergencyRequest> {
    let codes_raw: String = row.get(6)?;
    Ok(EmergencyRequest {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        address: row.get(4)?,
        city: row.get(5)?,
        service_codes: codes_from_json(6, &codes_raw)?,
        urgency: row.get(7)?,
        offered_price: row.get(8)?,
        notes: row.get(9)?,
        status: row.get(10)?,
        created_at: row.get(11)?,
    })
}

const REQUEST_COLUMNS: &str = "id, patient_name, latitude, longitude, address, city, \
     service_codes, urgency, offered_price, notes, status, created_at";

/// All requests currently open for offers, newest first.
pub fn list_live(conn: &Connection) -> Result<Vec<EmergencyRequest>, ServerError> {
    let mut stmt = conn
        .prepare(SQL_LIVE_REQUESTS)
        .map_err(|e| ServerError::DbError(format!("prepare live requests failed: {e}")))?;

    let rows = stmt
        .query_map([], request_from_row)
        .map_err(|e| ServerError::DbError(format!("query live requests failed: {e}")))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(format!("read request row failed: {e}")))?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<EmergencyRequest>, ServerError> {
    conn.query_row(
        &format!("select {REQUEST_COLUMNS} from requests where id = ?"),
        params![id],
        request_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select request failed: {e}")))
}

/// Insert a request row. Called from the patient-facing seam and tests;
/// the caregiver feed never writes here.
pub fn insert(conn: &Connection, req: &EmergencyRequest) -> Result<(), ServerError> {
    conn.execute(
        &format!(
            "insert into requests ({REQUEST_COLUMNS})
             values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        params![
            req.id,
            req.patient_name,
            req.latitude,
            req.longitude,
            req.address,
            req.city,
            codes_to_json(&req.service_codes),
            req.urgency,
            req.offered_price,
            req.notes,
            req.status,
            req.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert request failed: {e}")))?;
    Ok(())
}

/// Transition a request's status and return the updated row, or `None`
/// if no such request exists.
pub fn set_status(
    conn: &Connection,
    id: &str,
    status: RequestStatus,
) -> Result<Option<EmergencyRequest>, ServerError> {
    let updated = conn
        .execute(
            "update requests set status = ? where id = ?",
            params![status, id],
        )
        .map_err(|e| ServerError::DbError(format!("update request status failed: {e}")))?;

    if updated == 0 {
        return Ok(None);
    }
    get(conn, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Urgency;
    use rusqlite::Connection;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql"))
            .unwrap();
        conn
    }

    fn sample(id: &str, created_at: i64) -> EmergencyRequest {
        EmergencyRequest {
            id: id.into(),
            patient_name: "A. Patient".into(),
            latitude: 30.0444,
            longitude: 31.2357,
            address: "12 Nile St".into(),
            city: "Cairo".into(),
            service_codes: vec!["wound_care".into(), "injection".into()],
            urgency: Urgency::Critical,
            offered_price: Some(400),
            notes: None,
            status: RequestStatus::Live,
            created_at,
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let conn = test_conn();
        let req = sample("r1", 1000);
        insert(&conn, &req).unwrap();
        assert_eq!(get(&conn, "r1").unwrap(), Some(req));
        assert_eq!(get(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn list_live_is_newest_first_and_skips_closed() {
        let conn = test_conn();
        insert(&conn, &sample("old", 1000)).unwrap();
        insert(&conn, &sample("new", 2000)).unwrap();
        let mut matched = sample("matched", 3000);
        matched.status = RequestStatus::Matched;
        insert(&conn, &matched).unwrap();

        let live = list_live(&conn).unwrap();
        let ids: Vec<&str> = live.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn set_status_returns_updated_row() {
        let conn = test_conn();
        insert(&conn, &sample("r1", 1000)).unwrap();

        let updated = set_status(&conn, "r1", RequestStatus::Matched)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, RequestStatus::Matched);

        assert_eq!(set_status(&conn, "ghost", RequestStatus::Expired).unwrap(), None);
    }
}

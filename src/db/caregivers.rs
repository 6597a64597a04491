use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{codes_from_json, codes_to_json};
use crate::domain::CaregiverProfile;
use crate::errors::ServerError;

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<CaregiverProfile> {
    let codes_raw: String = row.get(3)?;
    Ok(CaregiverProfile {
        id: row.get(0)?,
        display_name: row.get(1)?,
        city: row.get(2)?,
        service_codes: codes_from_json(3, &codes_raw)?,
        radius_km: row.get(4)?,
        default_fee: row.get(5)?,
        latitude: row.get(6)?,
        longitude: row.get(7)?,
    })
}

pub fn get_profile(conn: &Connection, id: &str) -> Result<Option<CaregiverProfile>, ServerError> {
    conn.query_row(
        "select id, display_name, city, service_codes, radius_km, default_fee,
                latitude, longitude
         from caregivers where id = ?",
        params![id],
        profile_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select caregiver failed: {e}")))
}

/// Used by the onboarding seam and tests; the feed never creates profiles.
pub fn insert_profile(
    conn: &Connection,
    profile: &CaregiverProfile,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into caregivers (
            id, display_name, city, service_codes, radius_km, default_fee,
            latitude, longitude, created_at
         ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            profile.id,
            profile.display_name,
            profile.city,
            codes_to_json(&profile.service_codes),
            profile.radius_km,
            profile.default_fee,
            profile.latitude,
            profile.longitude,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert caregiver failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql"))
            .unwrap();
        conn
    }

    #[test]
    fn profile_round_trips() {
        let conn = test_conn();
        let profile = CaregiverProfile {
            id: "cg1".into(),
            display_name: "Nour H.".into(),
            city: "Alexandria".into(),
            service_codes: vec!["elderly_care".into()],
            radius_km: Some(15.0),
            default_fee: Some(300),
            latitude: Some(31.2),
            longitude: Some(29.9),
        };
        insert_profile(&conn, &profile, 1000).unwrap();
        assert_eq!(get_profile(&conn, "cg1").unwrap(), Some(profile));
        assert_eq!(get_profile(&conn, "nope").unwrap(), None);
    }
}

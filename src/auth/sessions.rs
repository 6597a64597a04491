use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{generate_token_default, hash_token};
use crate::errors::ServerError;

const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// Issue a session for a caregiver and return the raw token.
/// Called by the onboarding seam and tests; routes only resolve tokens.
pub fn create_session(
    conn: &Connection,
    caregiver_id: &str,
    now: i64,
) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);

    conn.execute(
        "insert into sessions (caregiver_id, token_hash, created_at, expires_at)
         values (?, ?, ?, ?)",
        params![caregiver_id, hash.as_slice(), now, now + SESSION_TTL_SECS],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// Resolve a raw session token to a caregiver id, if the session is
/// current and unrevoked.
pub fn load_caregiver_from_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<String>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        "select c.id
         from sessions s
         join caregivers c on c.id = s.caregiver_id
         where s.token_hash = ?
           and s.expires_at > ?
           and s.revoked_at is null",
        params![hash.as_slice(), now],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

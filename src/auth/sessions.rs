// src/auth/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{generate_token_default, hash_token};
use crate::auth::{PrincipalId, RequestAuth};
use crate::errors::ServerError;

pub const SESSION_COOKIE: &str = "session";

/// Start a session. `user_id` is `None` for guests.
/// Returns the raw token for the cookie; only its hash is stored.
pub fn create_session(
    conn: &Connection,
    user_id: Option<i64>,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);

    conn.execute(
        r#"
        insert into sessions (user_id, token_hash, created_at, expires_at)
        values (?, ?, ?, ?)
        "#,
        params![user_id, hash.as_slice(), now, now + ttl_secs],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// Resolve a live session into the request identity.
/// `Ok(None)` means no valid session; `Some(RequestAuth::guest())` is a guest session.
pub fn load_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<RequestAuth>, ServerError> {
    let hash = hash_token(raw_token);

    let row: Option<(Option<String>, Option<String>)> = conn
        .query_row(
            r#"
            select u.uid, u.email
            from sessions s
            left join users u on u.id = s.user_id
            where s.token_hash = ?
              and s.expires_at > ?
              and s.revoked_at is null
            "#,
            params![hash.as_slice(), now],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    Ok(row.map(|(uid, email)| match (uid, email) {
        (Some(uid), Some(email)) => RequestAuth::signed_in(PrincipalId::new(uid), email),
        _ => RequestAuth::guest(),
    }))
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}

/// Pull the session token out of a `Cookie` header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}

pub fn session_cookie(token: &str, ttl_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

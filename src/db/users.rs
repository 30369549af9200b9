// src/db/users.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub uid: String,
    pub email: String,
    pub password_salt: Vec<u8>,
    pub password_hash: Vec<u8>,
}

/// Insert a new account. Returns `Ok(None)` when the email is already taken.
/// Email should already be normalized by caller (trim/lowercase).
pub fn insert_user(
    conn: &Connection,
    uid: &str,
    email: &str,
    salt: &[u8],
    hash: &[u8],
    now: i64,
) -> Result<Option<i64>, ServerError> {
    let inserted = conn
        .execute(
            "insert or ignore into users (uid, email, password_salt, password_hash, created_at)
             values (?, ?, ?, ?, ?)",
            params![uid, email, salt, hash, now],
        )
        .map_err(|e| ServerError::DbError(format!("insert user failed: {e}")))?;

    if inserted == 0 {
        return Ok(None);
    }
    Ok(Some(conn.last_insert_rowid()))
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        "select id, uid, email, password_salt, password_hash from users where email = ?",
        params![email],
        |r| {
            Ok(UserRow {
                id: r.get(0)?,
                uid: r.get(1)?,
                email: r.get(2)?,
                password_salt: r.get(3)?,
                password_hash: r.get(4)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user failed: {e}")))
}

pub fn touch_last_login(conn: &Connection, user_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update users set last_login_at = ? where id = ?",
        params![now, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update last_login_at failed: {e}")))?;
    Ok(())
}

pub fn update_password(
    conn: &Connection,
    user_id: i64,
    salt: &[u8],
    hash: &[u8],
) -> Result<(), ServerError> {
    conn.execute(
        "update users set password_salt = ?, password_hash = ? where id = ?",
        params![salt, hash, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update password failed: {e}")))?;
    Ok(())
}

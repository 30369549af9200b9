// src/db/resets.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
struct ResetRow {
    id: i64,
    user_id: i64,
    expires_at: i64,
    used_at: Option<i64>,
}

/// Insert a reset row (token_hash should be SHA-256 bytes).
pub fn insert_reset(
    conn: &Connection,
    user_id: i64,
    token_hash: &[u8],
    created_at: i64,
    expires_at: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into password_resets (user_id, token_hash, created_at, expires_at) values (?, ?, ?, ?)",
        params![user_id, token_hash, created_at, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("insert password reset failed: {e}")))?;
    Ok(())
}

/// Check a reset token without consuming it.
pub fn reset_is_redeemable(
    conn: &Connection,
    token_hash: &[u8],
    now: i64,
) -> Result<bool, ServerError> {
    let n: i64 = conn
        .query_row(
            "select count(*) from password_resets
             where token_hash = ? and used_at is null and expires_at > ?",
            params![token_hash, now],
            |r| r.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("select password reset failed: {e}")))?;
    Ok(n > 0)
}

/// Consume a reset token hash:
/// - must exist
/// - must be unexpired (expires_at > now)
/// - must be unused (used_at is null)
///
/// Runs `apply(user_id)` inside the same transaction, then marks the row used.
/// Returns `Ok(None)` when the token is not redeemable.
pub fn consume_reset<F>(
    conn: &mut Connection,
    token_hash: &[u8],
    now: i64,
    apply: F,
) -> Result<Option<i64>, ServerError>
where
    F: FnOnce(&Connection, i64) -> Result<(), ServerError>,
{
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let row: Option<ResetRow> = tx
        .query_row(
            "select id, user_id, expires_at, used_at
             from password_resets
             where token_hash = ?",
            params![token_hash],
            |r| {
                Ok(ResetRow {
                    id: r.get(0)?,
                    user_id: r.get(1)?,
                    expires_at: r.get(2)?,
                    used_at: r.get(3)?,
                })
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select password reset in tx failed: {e}")))?;

    let Some(reset) = row else {
        tx.rollback().ok();
        return Ok(None);
    };

    if reset.used_at.is_some() || reset.expires_at <= now {
        tx.rollback().ok();
        return Ok(None);
    }

    // guard used_at IS NULL so only one consumer wins
    let updated = tx
        .execute(
            "update password_resets set used_at = ? where id = ? and used_at is null",
            params![now, reset.id],
        )
        .map_err(|e| ServerError::DbError(format!("mark password reset used failed: {e}")))?;

    if updated != 1 {
        tx.rollback().ok();
        return Ok(None);
    }

    apply(&tx, reset.user_id)?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(Some(reset.user_id))
}

// src/auth/reset.rs
use rand::rngs::OsRng;
use rusqlite::Connection;

use crate::auth::token::{
    generate_salt, generate_token_default, hash_password, hash_token, PASSWORD_ITERATIONS,
};
use crate::auth::accounts::AccountService;
use crate::db::{resets, users};
use crate::errors::ServerError;

pub const RESET_SENT_MESSAGE: &str = "Password reset email sent. Check your inbox.";

#[derive(Debug, Clone)]
pub struct ResetConfig {
    /// TTL for reset links in seconds.
    pub ttl_secs: i64,
    /// Relative path used when building links.
    pub confirm_path: String,
    pub password_iterations: u32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            confirm_path: "/auth/reset/confirm".to_string(),
            password_iterations: PASSWORD_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedReset {
    pub email: String,
    pub expires_at: i64,
    /// Relative URL like "/auth/reset/confirm?token=..."
    pub link: String,
}

impl IssuedReset {
    /// Raw token carried by the link.
    #[cfg(test)]
    pub fn token(&self) -> &str {
        self.link.split_once("token=").map(|(_, t)| t).unwrap_or("")
    }
}

pub struct PasswordResetService {
    cfg: ResetConfig,
}

impl PasswordResetService {
    pub fn new(cfg: ResetConfig) -> Self {
        Self { cfg }
    }

    fn build_link(&self, token: &str) -> String {
        format!("{}?token={}", self.cfg.confirm_path, token)
    }

    /// Issue a single-use reset token.
    /// Unknown emails return `Ok(None)` so callers can answer identically.
    pub fn request_reset(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<Option<IssuedReset>, ServerError> {
        let email = AccountService::normalize_email(email)?;
        let Some(user) = users::find_user_by_email(conn, &email)? else {
            tracing::info!("password reset requested for unknown email");
            return Ok(None);
        };

        let token = generate_token_default();
        let expires_at = now + self.cfg.ttl_secs;
        resets::insert_reset(conn, user.id, &hash_token(&token), now, expires_at)?;

        Ok(Some(IssuedReset {
            email,
            link: self.build_link(&token),
            expires_at,
        }))
    }

    pub fn token_is_valid(&self, conn: &Connection, token: &str, now: i64) -> Result<bool, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(false);
        }
        resets::reset_is_redeemable(conn, &hash_token(token), now)
    }

    /// Consume the token and store the new password in one transaction.
    pub fn reset_password(
        &self,
        conn: &mut Connection,
        token: &str,
        new_password: &str,
        now: i64,
    ) -> Result<(), ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }
        AccountService::check_password(new_password)?;

        let salt = generate_salt(&mut OsRng);
        let hash = hash_password(new_password, &salt, self.cfg.password_iterations);

        let consumed = resets::consume_reset(conn, &hash_token(token), now, |tx, user_id| {
            users::update_password(tx, user_id, &salt, &hash)
        })?;

        match consumed {
            Some(user_id) => {
                tracing::info!(user_id, "password reset");
                Ok(())
            }
            None => Err(ServerError::Unauthorized("invalid or expired link".into())),
        }
    }
}

// src/auth/accounts.rs
use rand::rngs::OsRng;
use rusqlite::Connection;

use crate::auth::sessions::{create_session, revoke_session};
use crate::auth::token::{
    generate_principal_id, generate_salt, hash_password, hashes_equal, PASSWORD_ITERATIONS,
};
use crate::auth::{PrincipalId, RequestAuth};
use crate::db::users;
use crate::errors::ServerError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub password_iterations: u32,
    pub session_ttl_secs: i64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            password_iterations: PASSWORD_ITERATIONS,
            session_ttl_secs: 60 * 60 * 24 * 7,
        }
    }
}

/// A freshly started session: raw cookie token plus who it belongs to.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub auth: RequestAuth,
}

pub struct AccountService {
    cfg: AccountConfig,
}

impl AccountService {
    pub fn new(cfg: AccountConfig) -> Self {
        Self { cfg }
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.cfg.session_ttl_secs
    }

    /// Trim + lowercase, minimal sanity check.
    pub fn normalize_email(email: &str) -> Result<String, ServerError> {
        let e = email.trim().to_lowercase();
        if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
            return Err(ServerError::BadRequest("invalid email".into()));
        }
        Ok(e)
    }

    pub fn check_password(password: &str) -> Result<(), ServerError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServerError::BadRequest(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Create an account and sign it in.
    pub fn register(
        &self,
        conn: &Connection,
        email: &str,
        password: &str,
        now: i64,
    ) -> Result<SignedIn, ServerError> {
        let email = Self::normalize_email(email)?;
        Self::check_password(password)?;

        let uid = generate_principal_id(&mut OsRng);
        let salt = generate_salt(&mut OsRng);
        let hash = hash_password(password, &salt, self.cfg.password_iterations);

        let Some(user_id) = users::insert_user(conn, &uid, &email, &salt, &hash, now)? else {
            return Err(ServerError::BadRequest(
                "an account with this email already exists".into(),
            ));
        };
        users::touch_last_login(conn, user_id, now)?;

        let token = create_session(conn, Some(user_id), now, self.cfg.session_ttl_secs)?;
        tracing::info!(principal = %uid, "account registered");

        Ok(SignedIn {
            token,
            auth: RequestAuth::signed_in(PrincipalId::new(uid), email),
        })
    }

    pub fn login(
        &self,
        conn: &Connection,
        email: &str,
        password: &str,
        now: i64,
    ) -> Result<SignedIn, ServerError> {
        let invalid = || ServerError::Unauthorized("invalid email or password".into());

        let email = Self::normalize_email(email).map_err(|_| invalid())?;
        let user = users::find_user_by_email(conn, &email)?.ok_or_else(invalid)?;

        let candidate = hash_password(password, &user.password_salt, self.cfg.password_iterations);
        if !hashes_equal(&candidate, &user.password_hash) {
            tracing::info!("login rejected");
            return Err(invalid());
        }

        users::touch_last_login(conn, user.id, now)?;
        let token = create_session(conn, Some(user.id), now, self.cfg.session_ttl_secs)?;
        tracing::info!(principal = %user.uid, "signed in");

        Ok(SignedIn {
            token,
            auth: RequestAuth::signed_in(PrincipalId::new(user.uid), user.email),
        })
    }

    /// Anonymous session: browses every report, cannot file one.
    pub fn login_as_guest(&self, conn: &Connection, now: i64) -> Result<SignedIn, ServerError> {
        let token = create_session(conn, None, now, self.cfg.session_ttl_secs)?;
        tracing::info!("guest session started");
        Ok(SignedIn {
            token,
            auth: RequestAuth::guest(),
        })
    }

    pub fn sign_out(&self, conn: &Connection, token: &str, now: i64) -> Result<(), ServerError> {
        revoke_session(conn, token, now)
    }
}

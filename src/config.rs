// src/config.rs
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_USER_AGENT: &str = "missing-pets/0.1 (+https://github.com/missing-pets)";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Service settings, read from `PETS_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub blob_root: PathBuf,
    /// Base used when building durable blob URLs, e.g. "http://127.0.0.1:3000".
    pub public_base_url: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub session_ttl_secs: i64,
    pub reset_ttl_secs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "pets.sqlite3".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            blob_root: PathBuf::from("blobs"),
            public_base_url: "http://127.0.0.1:3000".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            geocoder_user_agent: DEFAULT_USER_AGENT.to_string(),
            geocoder_timeout_secs: 10,
            session_ttl_secs: 60 * 60 * 24 * 7,
            reset_ttl_secs: 15 * 60,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("PETS_DB_PATH") {
            cfg.db_path = v;
        }
        if let Some(v) = lookup("PETS_BIND") {
            cfg.bind_addr = parse("PETS_BIND", v)?;
        }
        if let Some(v) = lookup("PETS_MAX_WORKERS") {
            cfg.max_workers = parse("PETS_MAX_WORKERS", v)?;
        }
        if let Some(v) = lookup("PETS_BLOB_ROOT") {
            cfg.blob_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("PETS_PUBLIC_BASE_URL") {
            cfg.public_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("PETS_GEOCODER_URL") {
            cfg.geocoder_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("PETS_GEOCODER_USER_AGENT") {
            cfg.geocoder_user_agent = v;
        }
        if let Some(v) = lookup("PETS_GEOCODER_TIMEOUT_SECS") {
            cfg.geocoder_timeout_secs = parse("PETS_GEOCODER_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("PETS_SESSION_TTL_SECS") {
            cfg.session_ttl_secs = parse("PETS_SESSION_TTL_SECS", v)?;
        }
        if let Some(v) = lookup("PETS_RESET_TTL_SECS") {
            cfg.reset_ttl_secs = parse("PETS_RESET_TTL_SECS", v)?;
        }

        Ok(cfg)
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

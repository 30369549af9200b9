// errors.rs
use std::fmt;

use crate::repository::ReportError;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, reports).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    Unauthorized(String),
    DbError(String),
    Report(ReportError),
    InternalError,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::Report(err) => write!(f, "{err}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<ReportError> for ServerError {
    fn from(err: ReportError) -> Self {
        ServerError::Report(err)
    }
}

//! Domain-level error type shared by every component.

use thiserror::Error;

/// Errors surfaced by domain and application logic.
///
/// HTTP handlers render these as `{"detail": "..."}` bodies (§6); the OCPP
/// session layer maps the relevant variants onto OCPP status codes instead
/// of propagating the message text to the charge point.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found (by {field} = {value})")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{entity} already exists: {value}")]
    AlreadyExists { entity: &'static str, value: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("capacity constraint violated: {0}")]
    Capacity(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("charge point not connected: {0}")]
    NotConnected(String),

    #[error("operation timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sea_orm::DbErr> for DomainError {
    fn from(err: sea_orm::DbErr) -> Self {
        DomainError::Storage(err.to_string())
    }
}

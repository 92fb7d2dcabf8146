//! Error types for the feedback service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored label that no longer parses
    #[error("Corrupt feedback record: {0}")]
    CorruptRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reach the caller as a bare 500; the cause only goes to the log.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

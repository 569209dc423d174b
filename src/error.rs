//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::error_body;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    InvalidUrl(String),
}

/// Failure classes of the request pipeline. All of them surface on the wire as
/// HTTP 500 with a flat `{"error": message}` body; the class is only logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    QueryFailed(String),
    #[error("{0}")]
    Timeout(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unavailable(_) => "unavailable",
            AppError::QueryFailed(_) => "query_failed",
            AppError::Timeout(_) => "timeout",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::Unavailable(e.to_string()),
            // Server-side errors carry the plain message reported by Postgres.
            sqlx::Error::Database(db) => AppError::QueryFailed(db.message().to_string()),
            other => AppError::QueryFailed(other.to_string()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout("query timed out".into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_body(self.to_string()))).into_response()
    }
}

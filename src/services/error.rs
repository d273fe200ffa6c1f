//! Error handling utilities for route handlers

use axum::http::StatusCode;

use crate::error::SyncError;

impl SyncError {
    /// Status a route answers with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            SyncError::Fetch(_) => StatusCode::BAD_GATEWAY,
            SyncError::Read(_) | SyncError::Update(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extension trait for logging errors and converting to StatusCode
pub trait LogErr<T> {
    /// Log error with context and return the status matching its kind
    fn log_status(self, context: &str) -> Result<T, StatusCode>;
}

impl<T> LogErr<T> for Result<T, SyncError> {
    fn log_status(self, context: &str) -> Result<T, StatusCode> {
        self.map_err(|e| {
            tracing::error!(kind = e.kind(), "{}: {}", context, e);
            e.status_code()
        })
    }
}

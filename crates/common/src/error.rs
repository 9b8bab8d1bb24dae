//! Error types for opengraph-rs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Returns whether this error should be logged at error level.
    ///
    /// Failures caused by the request (a malformed URL, an unreachable page)
    /// only warrant debug logging; failures on our side do not.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::InvalidUrl(_) | Self::Fetch(_) => false,
            Self::ExternalService(_) | Self::Config(_) => true,
        }
    }
}

impl IntoResponse for AppError {
    /// Every failure surfaces as a plain-text 400.
    ///
    /// Callers hand over arbitrary URLs and treat any non-200 as "no preview
    /// available", so the response collapses all error kinds into one shape.
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "Preview request failed");
        } else {
            tracing::debug!(error = %self, "Preview request failed");
        }

        (StatusCode::BAD_REQUEST, format!("Unhandled exception: {self}")).into_response()
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_side_failures_are_not_server_errors() {
        assert!(!AppError::InvalidUrl("nope".to_string()).is_server_error());
        assert!(!AppError::Fetch("timed out".to_string()).is_server_error());
        assert!(AppError::ExternalService("api down".to_string()).is_server_error());
    }

    #[test]
    fn test_display_carries_the_detail() {
        let err = AppError::InvalidUrl("not-a-url".to_string());
        assert_eq!(err.to_string(), "Invalid URL: not-a-url");
    }
}

//! Error handling module.
//!
//! This module provides unified error handling with proper HTTP status code mapping
//! and standardized API error responses.

pub mod codes;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::ApiResponse;

pub use codes::{ErrorCategory, ErrorCode};

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Identifier generator failure.
    #[error(transparent)]
    Generator(#[from] IdError),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Generator(IdError::InvalidMachineId(_)) => ErrorCode::INVALID_MACHINE_ID,
            Self::Generator(IdError::ClockRegression { .. }) => ErrorCode::CLOCK_REGRESSION,
            Self::BadRequest(_) => ErrorCode::BAD_REQUEST,
            Self::Internal(_) => ErrorCode::INTERNAL_ERROR,
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Generator(IdError::ClockRegression { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Generator(IdError::InvalidMachineId(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = code.as_i32(),
            category = %code.category(),
            status = %status,
            message = %message,
            "Request failed"
        );

        let body = Json(ApiResponse::<()>::error(code.as_i32(), message));

        (status, body).into_response()
    }
}

/// Identifier generator error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Machine identity outside `0..=1023`.
    #[error("Machine ID {0} out of range (0..=1023)")]
    InvalidMachineId(i64),

    /// The clock reads earlier than the last allocation.
    #[error("Clock moved backwards: last={last}ms, now={now}ms")]
    ClockRegression {
        /// Last recorded allocation time (Unix ms).
        last: i64,
        /// Observed time (Unix ms).
        now: i64,
    },
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias using `IdError`.
pub type IdResult<T> = std::result::Result<T, IdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::from(IdError::InvalidMachineId(-1)).error_code(),
            ErrorCode::INVALID_MACHINE_ID
        );
        assert_eq!(
            AppError::from(IdError::ClockRegression { last: 2, now: 1 }).error_code(),
            ErrorCode::CLOCK_REGRESSION
        );
        assert_eq!(
            AppError::BadRequest("test".to_string()).error_code(),
            ErrorCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("test".to_string()).error_code(),
            ErrorCode::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::from(IdError::ClockRegression { last: 2, now: 1 }).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::BadRequest("count".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(IdError::InvalidMachineId(2048)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AppError::from(IdError::ClockRegression { last: 10, now: 7 }).to_string(),
            "Clock moved backwards: last=10ms, now=7ms"
        );
        assert_eq!(
            IdError::InvalidMachineId(1024).to_string(),
            "Machine ID 1024 out of range (0..=1023)"
        );
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response =
            AppError::from(IdError::ClockRegression { last: 10, now: 7 }).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 5004);
        assert_eq!(body["message"], "Clock moved backwards: last=10ms, now=7ms");
        assert!(body["data"].is_null());
        assert_eq!(
            ErrorCode::CLOCK_REGRESSION.category(),
            ErrorCategory::Internal
        );
    }
}

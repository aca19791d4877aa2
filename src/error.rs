//! Application error type and its HTTP mapping.
//!
//! Client mistakes (`InvalidUrl`, `InvalidOption`, `BadRequest`, `NotFound`)
//! become 4xx responses carrying a human-readable message. Server-side failures
//! (`GenerationExhausted`, `StoreFailure`, `Render`) become 500 and are logged
//! before the response is produced.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::repositories::StoreError;

/// JSON body returned for every error response: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Input is not an absolute URL with a scheme and a host.
    #[error("invalid URL format")]
    InvalidUrl,

    /// QR level or size is outside the accepted values.
    #[error("{0}")]
    InvalidOption(String),

    /// Request body or parameters could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    #[error("URL not found")]
    NotFound,

    /// Every attempt allowed by the retry policy collided with an existing code.
    #[error("failed to generate unique code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),

    #[error("failed generating qr code: {0}")]
    Render(String),
}

impl AppError {
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl | AppError::InvalidOption(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::GenerationExhausted { .. }
            | AppError::StoreFailure(_)
            | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to clients. Store details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::StoreFailure(_) => "internal server error".to_string(),
            AppError::GenerationExhausted { .. } => "failed to generate unique code".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::StoreFailure(StoreError::from(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(AppError::InvalidUrl.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::invalid_option("bad level").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_errors_map_to_5xx() {
        assert_eq!(
            AppError::GenerationExhausted { attempts: 10 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::StoreFailure(StoreError::Conflict).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_details_are_not_exposed() {
        let err = AppError::StoreFailure(StoreError::Conflict);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(AppError::NotFound.to_string(), "URL not found");
    }
}

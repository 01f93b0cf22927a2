//! API error types and HTTP mappings.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use helmdesk_domain::HelmdeskError;
use serde::Serialize;
use thiserror::Error;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client handling.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain error from the core engines.
    #[error(transparent)]
    Domain(#[from] HelmdeskError),

    /// Request rejected before reaching the core.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Tenant identity missing or malformed.
    #[error("Authentication required")]
    Unauthorized,
}

/// Result alias for handler return types.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::Domain(domain) => match domain {
                HelmdeskError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                HelmdeskError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                // A stored-but-degenerate SLA config: the request was fine,
                // the tenant's settings are not.
                HelmdeskError::Configuration(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "configuration_error")
                }
                HelmdeskError::Database(_) | HelmdeskError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse { error: code.to_string(), message: self.to_string() };
        (status, Json(body)).into_response()
    }
}

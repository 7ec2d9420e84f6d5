//! Maps domain `AppError` to HTTP responses through the local [`ApiError`] wrapper.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use tokenwarden_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Transport-side wrapper so domain errors can be rendered by axum.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidCredential
        | ErrorKind::Expired
        | ErrorKind::Revoked
        | ErrorKind::InvalidSignature => StatusCode::UNAUTHORIZED,
        ErrorKind::SecurityViolation => StatusCode::FORBIDDEN,
        ErrorKind::Validation | ErrorKind::Malformed => StatusCode::BAD_REQUEST,
        ErrorKind::Timeout | ErrorKind::Database | ErrorKind::ExternalService => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ErrorKind::CorruptDigest
        | ErrorKind::Encoding
        | ErrorKind::Configuration
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self(err) = self;
        let status = status_for(err.kind);

        if status.is_server_error() {
            if err.is_transient() {
                tracing::warn!(kind = %err.kind, error = %err, "Transient failure");
            } else {
                tracing::error!(kind = %err.kind, error = %err, "Internal server error");
            }
        }

        // Internal faults are not described to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: err.kind.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

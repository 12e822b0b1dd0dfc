//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::qr::QrError;

/// Error codes carried in JSON error bodies.
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Email not on the admin allow-list.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The ledger already holds the largest possible id.
    #[error("No member ids left to assign")]
    IdsExhausted,

    /// Record store error.
    #[error("Storage error: {0}")]
    Store(#[from] record_store::StoreError),

    /// QR code generation error.
    #[error("QR error: {0}")]
    Qr(#[from] QrError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST, msg.clone())
            }
            ServerError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND, msg.clone())
            }
            ServerError::Conflict(msg) => {
                (StatusCode::CONFLICT, error_codes::ALREADY_EXISTS, msg.clone())
            }
            ServerError::PermissionDenied(msg) => {
                (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED, msg.clone())
            }
            ServerError::IdsExhausted => {
                tracing::error!("Member id space exhausted");
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, self.to_string())
            }
            ServerError::Store(e) => {
                tracing::error!(error = %e, "Record store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, e.to_string())
            }
            ServerError::Qr(e) => {
                tracing::error!(error = %e, "QR generation failure");
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, e.to_string())
            }
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

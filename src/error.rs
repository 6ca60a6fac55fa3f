//! Error types for the bridge
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Bridge Error Enum ==
/// Unified error type for the bridge.
///
/// None of these are fatal to the process. Background work logs them and
/// carries on; interactive actions hand the message back to the issuer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Malformed record or request, e.g. a status without an identifier
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown short key
    #[error("Unknown reference: {0}")]
    KeyNotFound(String),

    /// The remote object is already gone or nothing matched
    #[error("Not found on remote: {0}")]
    RemoteNotFound(String),

    /// Transient or permanent failure reported by the remote service
    #[error("Remote API error: {0}")]
    RemoteApi(String),

    /// Durable store read or write failed
    #[error("Storage error: {0}")]
    Storage(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = match &self {
            BridgeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BridgeError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            BridgeError::RemoteNotFound(_) => StatusCode::NOT_FOUND,
            BridgeError::RemoteApi(_) => StatusCode::BAD_GATEWAY,
            BridgeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the bridge.
pub type Result<T> = std::result::Result<T, BridgeError>;

//! HTTP API surface
//!
//! A small versioned REST API guarded by an X-API-Key header. Routes are
//! bound in an explicit static table at startup (see `server::build_router`).

pub mod auth;
pub mod routes;
pub mod server;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::RegistrationService;
use crate::utils::errors::AvangardError;

/// Name of the credential header.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Shared state for the API handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub registration: RegistrationService,
    /// Configured shared secret; `None` fails every protected request closed.
    pub api_key: Option<String>,
}

/// Response envelope used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<i64>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>, key: i64) -> Self {
        Self {
            status: true,
            message: message.into(),
            key: Some(key),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            key: None,
        }
    }
}

/// Map a domain error onto the wire.
///
/// Storage and key-generation faults are logged with context here and
/// surfaced as opaque server errors; no internal detail crosses the trust
/// boundary.
pub(crate) fn error_response(err: AvangardError) -> Response {
    let (status, message) = match &err {
        AvangardError::DuplicateRegistration { .. } => (
            StatusCode::CONFLICT,
            "Access denied. Account is already registered.".to_string(),
        ),
        AvangardError::UserNotFound { .. } => (
            StatusCode::CONFLICT,
            "Account is not registered.".to_string(),
        ),
        AvangardError::KeyGenerationExhausted { .. } => {
            error!(error = %err, "Failed to generate a unique access key");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate a unique access key.".to_string(),
            )
        }
        AvangardError::Authentication(_) => (
            StatusCode::UNAUTHORIZED,
            "Invalid or missing API key.".to_string(),
        ),
        AvangardError::Config(_) => {
            error!(error = %err, "Server configuration error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error.".to_string(),
            )
        }
        AvangardError::InvalidInput(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail.clone()),
        _ => {
            error!(error = %err, "Internal error while handling API request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.".to_string(),
            )
        }
    };

    (status, Json(ApiResponse::failure(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_carries_key() {
        let envelope = ApiResponse::ok("Registration complete.", 1234567890);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], true);
        assert_eq!(json["key"], 1234567890);
    }

    #[test]
    fn failure_envelope_omits_key_field() {
        let envelope = ApiResponse::failure("nope");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], false);
        assert!(json.get("key").is_none());
    }
}

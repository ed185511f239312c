//! API-key validation
//!
//! Pure comparison of the presented credential against the configured
//! secret, applied as middleware to every `/v1` route. A missing server
//! secret is a configuration error (500), distinct from a bad or absent
//! client credential (401), so a misconfigured deployment can never be
//! mistaken for one that allows anonymous access.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, warn};

use crate::api::{error_response, ApiState, API_KEY_HEADER};
use crate::utils::errors::{AvangardError, Result};

/// Compare a presented credential against the configured secret.
pub fn validate_api_key(configured: Option<&str>, presented: Option<&str>) -> Result<()> {
    let configured = match configured {
        Some(key) if !key.is_empty() => key,
        _ => {
            error!("API_KEY is not configured; refusing request");
            return Err(AvangardError::Config(
                "server API key is not configured".to_string(),
            ));
        }
    };

    match presented {
        Some(presented) if presented == configured => Ok(()),
        presented => {
            warn!(
                header_present = presented.is_some(),
                "Invalid or missing API key"
            );
            Err(AvangardError::Authentication(
                "invalid or missing API key".to_string(),
            ))
        }
    }
}

/// Axum middleware enforcing the X-API-Key header.
pub async fn require_api_key(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match validate_api_key(state.api_key.as_deref(), presented) {
        Ok(()) => next.run(request).await,
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn missing_configuration_fails_closed() {
        assert_matches!(
            validate_api_key(None, Some("anything")),
            Err(AvangardError::Config(_))
        );
        assert_matches!(
            validate_api_key(Some(""), Some("anything")),
            Err(AvangardError::Config(_))
        );
    }

    #[test]
    fn mismatch_is_an_authentication_error() {
        assert_matches!(
            validate_api_key(Some("secret"), Some("wrong")),
            Err(AvangardError::Authentication(_))
        );
    }

    #[test]
    fn absent_header_is_an_authentication_error() {
        assert_matches!(
            validate_api_key(Some("secret"), None),
            Err(AvangardError::Authentication(_))
        );
    }

    #[test]
    fn exact_match_succeeds() {
        assert!(validate_api_key(Some("secret"), Some("secret")).is_ok());
    }
}

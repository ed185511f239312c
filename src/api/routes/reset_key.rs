//! POST /v1/reset_key

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{error_response, ApiResponse, ApiState};

/// Body of `POST /v1/reset_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetKeyRequest {
    pub tg_id: i64,
}

/// Rotate an existing user's access key.
pub async fn reset_key(
    State(state): State<ApiState>,
    Json(payload): Json<ResetKeyRequest>,
) -> Response {
    match state.registration.reset_key(payload.tg_id).await {
        Ok(raw_key) => {
            info!(telegram_id = payload.tg_id, "reset_key succeeded");
            (
                [(header::CACHE_CONTROL, "no-store")],
                Json(ApiResponse::ok("Access key rotated.", raw_key)),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

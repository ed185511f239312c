//! POST /v1/create_user

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use tracing::info;

use crate::api::{error_response, ApiResponse, ApiState};
use crate::models::user::CreateUserRequest;

/// Register a user and issue their access key.
///
/// The raw key appears only in this response body, which is marked
/// `Cache-Control: no-store`; afterwards only the digest survives.
pub async fn create_user(
    State(state): State<ApiState>,
    Json(payload): Json<CreateUserRequest>,
) -> Response {
    match state.registration.register(payload).await {
        Ok((user, raw_key)) => {
            info!(
                telegram_id = user.telegram_id,
                user_id = user.id,
                "create_user succeeded"
            );
            (
                [(header::CACHE_CONTROL, "no-store")],
                Json(ApiResponse::ok("Registration complete.", raw_key)),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

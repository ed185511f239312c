//! HTTP API server
//!
//! Runs on the configured port alongside the bot dispatcher. All routes are
//! enumerated here and bound at startup.

use std::net::SocketAddr;

use axum::middleware;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{auth, routes, ApiState};
use crate::utils::errors::Result;

/// Build the `/v1` router with API-key enforcement on every route.
pub fn build_router(state: ApiState) -> Router {
    let v1 = Router::new()
        .route("/create_user", post(routes::create_user::create_user))
        .route("/reset_key", post(routes::reset_key::reset_key))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new().nest("/v1", v1).with_state(state)
}

/// Start the API server.
pub async fn serve(port: u16, state: ApiState) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(state);

    info!("Starting API server on http://{}", addr);
    info!("  POST /v1/create_user - register a user, issue an access key");
    info!("  POST /v1/reset_key   - rotate an existing user's access key");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

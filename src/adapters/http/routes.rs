//! HTTP routes for the honeypot API.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use super::handlers::{chat, get_session, health, list_sessions, purge_session, ApiState};
use super::middleware::{require_api_key, ApiKeyAuth};

/// Creates the API router.
///
/// The health endpoint is open; everything under `/api` requires the
/// API key.
pub fn api_routes(state: ApiState, auth: ApiKeyAuth) -> Router {
    let protected = Router::new()
        .route("/chat", post(chat))
        .route("/sessions", get(list_sessions))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id", delete(purge_session))
        .layer(middleware::from_fn_with_state(auth, require_api_key))
        .with_state(state);

    Router::new().route("/", get(health)).nest("/api", protected)
}

//! API-key middleware for axum.
//!
//! Every API route requires the shared key in the `x-api-key` header.
//! Key comparison is constant-time so response timing leaks nothing
//! about the expected key.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use super::dto::ErrorResponse;

/// Middleware state: the expected API key.
#[derive(Clone)]
pub struct ApiKeyAuth {
    expected: Secret<String>,
}

impl ApiKeyAuth {
    /// Creates the middleware state for the given key.
    pub fn new(expected: Secret<String>) -> Self {
        Self { expected }
    }

    fn matches(&self, presented: &str) -> bool {
        presented
            .as_bytes()
            .ct_eq(self.expected.expose_secret().as_bytes())
            .into()
    }
}

/// Rejects requests that lack a valid `x-api-key` header.
///
/// Missing key: 401. Wrong key: 403. Valid key: the request proceeds.
pub async fn require_api_key(
    State(auth): State<ApiKeyAuth>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    match presented {
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::unauthorized("API key required")),
        )
            .into_response(),
        Some(key) if !auth.matches(key) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::forbidden("Invalid API key")),
        )
            .into_response(),
        Some(_) => next.run(request).await,
    }
}

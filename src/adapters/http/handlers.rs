//! HTTP handlers for the honeypot API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{EngagementOrchestrator, InboundMessage};
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::dto::{
    ChatRequest, ChatResponse, ErrorResponse, SessionListResponse, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ApiState {
    orchestrator: Arc<EngagementOrchestrator>,
    store: Arc<dyn SessionStore>,
}

impl ApiState {
    pub fn new(orchestrator: Arc<EngagementOrchestrator>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET / - Health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "scambait",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/chat - Process one inbound message and return the reply.
pub async fn chat(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    let session_id = match request.session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Session ID cannot be empty")),
            )
                .into_response()
        }
    };

    let inbound = InboundMessage {
        session_id,
        sender: request.message.sender,
        text: request.message.text,
        external_timestamp: request.message.timestamp,
        history: request
            .conversation_history
            .into_iter()
            .map(Into::into)
            .collect(),
        metadata: request.metadata,
    };

    let outcome = state.orchestrator.handle_message(inbound).await;
    (StatusCode::OK, Json(ChatResponse::success(outcome.reply))).into_response()
}

/// GET /api/sessions - List all sessions (monitoring).
pub async fn list_sessions(State(state): State<ApiState>) -> Response {
    let sessions = state.store.list().await;
    let response = SessionListResponse {
        total: sessions.len(),
        sessions: sessions.iter().map(SessionResponse::from).collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/sessions/:id - Session detail (monitoring).
pub async fn get_session(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let session_id = match id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Session ID cannot be empty")),
            )
                .into_response()
        }
    };

    match state.store.find(&session_id).await {
        Some(session) => {
            (StatusCode::OK, Json(SessionResponse::from(&session))).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session", &id)),
        )
            .into_response(),
    }
}

/// DELETE /api/sessions/:id - Purge a session (management).
pub async fn purge_session(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let session_id = match id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Session ID cannot be empty")),
            )
                .into_response()
        }
    };

    if state.store.purge(&session_id).await {
        (
            StatusCode::OK,
            Json(serde_json::json!({"status": "deleted", "sessionId": id})),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session", &id)),
        )
            .into_response()
    }
}

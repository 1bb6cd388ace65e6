//! HTTP DTOs for the honeypot API.
//!
//! The wire format is camelCase to match the upstream message-exchange
//! contract; these types decouple it from the domain model.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ChannelMetadata;
use crate::domain::session::{SenderRole, Session, TranscriptEntry};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// The main chat request envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    pub message: InboundMessageDto,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntryDto>,
    #[serde(default)]
    pub metadata: ChannelMetadata,
}

/// The new message within a chat request.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessageDto {
    pub sender: SenderRole,
    pub text: String,
    /// Caller timestamp in epoch milliseconds.
    pub timestamp: i64,
}

/// One entry of the caller-supplied conversation history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntryDto {
    pub sender: SenderRole,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl From<HistoryEntryDto> for TranscriptEntry {
    fn from(dto: HistoryEntryDto) -> Self {
        Self {
            sender: dto.sender,
            text: dto.text,
            timestamp: dto.timestamp,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// The chat reply.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub status: String,
    pub reply: String,
}

impl ChatResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
        }
    }
}

/// Session detail view for monitoring.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub created_at: String,
    pub phase: String,
    pub scam_detected: bool,
    pub scam_confidence: f64,
    pub agent_engaged: bool,
    pub concluded: bool,
    pub callback_sent: bool,
    pub total_messages: usize,
    pub messages_since_engagement: usize,
    pub intelligence: crate::domain::intelligence::IntelligenceBundle,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            created_at: session.created_at().as_datetime().to_rfc3339(),
            phase: format!("{:?}", session.phase()).to_lowercase(),
            scam_detected: session.scam_detected(),
            scam_confidence: session.scam_confidence(),
            agent_engaged: session.agent_engaged(),
            concluded: session.concluded(),
            callback_sent: session.callback_sent(),
            total_messages: session.total_messages(),
            messages_since_engagement: session.messages_since_engagement(),
            intelligence: session.intelligence().clone(),
        }
    }
}

/// Summary list of sessions for monitoring.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionResponse>,
    pub total: usize,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }
}

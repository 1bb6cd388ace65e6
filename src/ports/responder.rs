//! Persona Responder Port - Interface for the reply generator.
//!
//! The responder is the persona-driven text generator (an LLM in
//! production). The orchestrator picks the intent; the adapter owns the
//! persona and wording. On any error the orchestrator substitutes a fixed
//! filler reply, so responder failure is never fatal to a turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ChannelMetadata;
use crate::domain::session::Message;

/// What kind of reply the orchestrator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyIntent {
    /// First persona reply right after detection: show concern, ask a
    /// clarifying question.
    Initial,
    /// Ongoing engagement: keep the sender talking, solicit specifics.
    Ongoing,
    /// Pre-detection small talk; gives nothing away.
    Neutral,
    /// Closing reply with a believable excuse to end the conversation.
    Final,
}

impl ReplyIntent {
    /// Returns true if the persona character drives this reply.
    pub fn uses_persona(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

/// Port for persona reply generation.
#[async_trait]
pub trait PersonaResponder: Send + Sync {
    /// Generates a reply for the given intent. The transcript is the
    /// session's message log including the latest inbound message.
    async fn generate(
        &self,
        intent: ReplyIntent,
        transcript: &[Message],
        metadata: &ChannelMetadata,
    ) -> Result<String, ResponderError>;
}

/// Responder errors.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    /// The generation service could not be reached.
    #[error("responder unavailable: {0}")]
    Unavailable(String),

    /// The service responded but produced no usable text.
    #[error("responder returned empty output")]
    EmptyOutput,

    /// The request exceeded the configured timeout.
    #[error("responder timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

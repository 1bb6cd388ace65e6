//! LLM-backed persona responder adapter.
//!
//! Owns the persona and the per-intent instructions. The orchestrator
//! only chooses an intent; everything about wording lives here.

use async_trait::async_trait;

use crate::domain::foundation::ChannelMetadata;
use crate::domain::session::{Message, SenderRole};
use crate::ports::{PersonaResponder, ReplyIntent, ResponderError};

use super::llm::{ChatCall, LlmClient, LlmError};

/// How many trailing transcript messages are included in the prompt.
const TRANSCRIPT_WINDOW: usize = 10;

const PERSONA_PROMPT: &str = "\
You are roleplaying as Ramesh Kumar, a 58-year-old bank customer from \
Mumbai. Middle-class, polite, trusting of official-sounding messages, not \
tech-savvy, simple conversational English with small mistakes.

Rules: never reveal you suspect a scam, never confront the sender, act \
cooperative but slightly confused, and ask questions that draw out \
specifics: which branch, what employee ID, which number to call, where to \
send payment, what link to use. Small delays and obstacles are good. Stay \
in character at all times.";

const NEUTRAL_PROMPT: &str = "\
You are an ordinary person replying to a message that may or may not be \
legitimate. Respond naturally and briefly (1-2 sentences). Be polite, give \
away no personal or sensitive information.";

/// Persona responder backed by a chat-completion LLM.
#[derive(Debug, Clone)]
pub struct LlmPersonaResponder {
    client: LlmClient,
}

impl LlmPersonaResponder {
    /// Creates a responder over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    fn instruction(intent: ReplyIntent) -> &'static str {
        match intent {
            ReplyIntent::Initial => {
                "This is your FIRST reply after their latest message. Show concern \
                 and willingness to comply, and ask one clarifying question that \
                 elicits useful detail. Keep it to 2-3 sentences."
            }
            ReplyIntent::Ongoing => {
                "Write your next reply. Try to extract specifics: phone numbers, \
                 payment handles, links, account details, names. Keep it natural \
                 and believable, 2-4 sentences."
            }
            ReplyIntent::Neutral => {
                "Reply to the latest message naturally and briefly, 1-2 sentences."
            }
            ReplyIntent::Final => {
                "This is your FINAL message in this conversation. End politely with \
                 a believable excuse (need to go out, will call later, must ask \
                 family). Keep it to 1-2 sentences."
            }
        }
    }

    fn build_context(
        &self,
        intent: ReplyIntent,
        transcript: &[Message],
        metadata: &ChannelMetadata,
    ) -> String {
        let mut context = String::from("Conversation so far:\n\n");

        let start = transcript.len().saturating_sub(TRANSCRIPT_WINDOW);
        for message in &transcript[start..] {
            let speaker = match message.sender() {
                SenderRole::Scammer => "Them",
                SenderRole::Defender => "You",
            };
            context.push_str(&format!("{}: {}\n", speaker, message.text()));
        }

        context.push_str(&format!("\nChannel: {}\n\n", metadata.channel));
        context.push_str(Self::instruction(intent));
        context
    }
}

#[async_trait]
impl PersonaResponder for LlmPersonaResponder {
    async fn generate(
        &self,
        intent: ReplyIntent,
        transcript: &[Message],
        metadata: &ChannelMetadata,
    ) -> Result<String, ResponderError> {
        let system = if intent.uses_persona() {
            PERSONA_PROMPT
        } else {
            NEUTRAL_PROMPT
        };

        let call = ChatCall {
            system: system.to_string(),
            user: self.build_context(intent, transcript, metadata),
            temperature: 0.8,
            max_tokens: 200,
            json_mode: false,
        };

        let reply = self.client.chat(&call).await.map_err(|e| match e {
            LlmError::Timeout { timeout_secs } => ResponderError::Timeout { timeout_secs },
            other => ResponderError::Unavailable(other.to_string()),
        })?;

        let reply = reply.trim().to_string();
        if reply.is_empty() {
            return Err(ResponderError::EmptyOutput);
        }
        Ok(reply)
    }
}

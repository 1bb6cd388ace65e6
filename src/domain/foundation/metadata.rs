//! Channel metadata accompanying each inbound message.

use serde::{Deserialize, Serialize};

/// Describes where a conversation is taking place.
///
/// Passed through to the classifier and responder so they can adapt tone
/// (an SMS scam reads differently from an email scam). Never interpreted
/// by the core itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    /// Transport channel, e.g. "SMS", "WhatsApp", "Email", "Chat".
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Conversation language.
    #[serde(default = "default_language")]
    pub language: String,

    /// Caller locale hint.
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for ChannelMetadata {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            language: default_language(),
            locale: default_locale(),
        }
    }
}

fn default_channel() -> String {
    "Chat".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

fn default_locale() -> String {
    "IN".to_string()
}

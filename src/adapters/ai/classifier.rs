//! LLM-backed scam classifier adapter.

use async_trait::async_trait;

use crate::domain::foundation::ChannelMetadata;
use crate::domain::session::TranscriptEntry;
use crate::ports::{ClassifierError, ScamClassifier, ScamVerdict};

use super::llm::{ChatCall, LlmClient, LlmError};
use super::verdict::parse_verdict;

/// How many trailing history entries are included in the prompt.
const HISTORY_WINDOW: usize = 5;

const SYSTEM_PROMPT: &str = "\
You are a scam detection system specializing in Indian scam patterns: fake \
KYC updates, prize notifications, delivery fraud, account blocking threats, \
OTP/PIN requests, tax refunds, advance-fee loans, digital arrest scams.

Indicators: urgency, requests for sensitive data (OTP, PIN, CVV, Aadhaar), \
unsolicited offers, threats of legal action or suspension, suspicious links \
or APK downloads, impersonation of banks, government, or courier services.

Analyze the message in its conversation context and respond ONLY with a \
JSON object: {\"is_scam\": true/false, \"confidence\": 0.0-1.0, \
\"reasoning\": \"brief explanation\"}";

/// Scam classifier backed by a chat-completion LLM.
#[derive(Debug, Clone)]
pub struct LlmScamClassifier {
    client: LlmClient,
}

impl LlmScamClassifier {
    /// Creates a classifier over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    fn build_context(
        &self,
        message: &str,
        history: &[TranscriptEntry],
        metadata: &ChannelMetadata,
    ) -> String {
        let mut context = format!(
            "Channel: {}\nLanguage: {}\nLocale: {}\n\n",
            metadata.channel, metadata.language, metadata.locale
        );

        if !history.is_empty() {
            context.push_str("Previous messages:\n");
            let start = history.len().saturating_sub(HISTORY_WINDOW);
            for entry in &history[start..] {
                let sender = match entry.sender {
                    crate::domain::session::SenderRole::Scammer => "scammer",
                    crate::domain::session::SenderRole::Defender => "user",
                };
                context.push_str(&format!("{}: {}\n", sender, entry.text));
            }
            context.push('\n');
        }

        context.push_str(&format!("Current message to analyze:\n{}", message));
        context
    }
}

#[async_trait]
impl ScamClassifier for LlmScamClassifier {
    async fn classify(
        &self,
        message: &str,
        history: &[TranscriptEntry],
        metadata: &ChannelMetadata,
    ) -> Result<ScamVerdict, ClassifierError> {
        let call = ChatCall {
            system: SYSTEM_PROMPT.to_string(),
            user: self.build_context(message, history, metadata),
            temperature: 0.3,
            max_tokens: 500,
            json_mode: true,
        };

        let raw = self.client.chat(&call).await.map_err(|e| match e {
            LlmError::Timeout { timeout_secs } => ClassifierError::Timeout { timeout_secs },
            LlmError::Parse(msg) => ClassifierError::Malformed(msg),
            other => ClassifierError::Unavailable(other.to_string()),
        })?;

        // Unusable text is a clean verdict, not an error; only transport
        // failures surface as Err.
        Ok(parse_verdict(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::llm::LlmConfig;
    use crate::domain::session::SenderRole;

    fn classifier() -> LlmScamClassifier {
        LlmScamClassifier::new(LlmClient::new(LlmConfig::new("test-key")))
    }

    fn entry(sender: SenderRole, text: &str) -> TranscriptEntry {
        TranscriptEntry {
            sender,
            text: text.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn context_includes_metadata() {
        let context = classifier().build_context("hello", &[], &ChannelMetadata::default());
        assert!(context.contains("Channel: Chat"));
        assert!(context.contains("Locale: IN"));
        assert!(context.contains("Current message to analyze:\nhello"));
    }

    #[test]
    fn context_includes_recent_history() {
        let history = vec![
            entry(SenderRole::Scammer, "your account is blocked"),
            entry(SenderRole::Defender, "oh no, what do I do?"),
        ];
        let context = classifier().build_context("send OTP", &history, &ChannelMetadata::default());
        assert!(context.contains("scammer: your account is blocked"));
        assert!(context.contains("user: oh no, what do I do?"));
    }

    #[test]
    fn context_windows_long_history() {
        let history: Vec<TranscriptEntry> = (0..12)
            .map(|i| entry(SenderRole::Scammer, &format!("message {i}")))
            .collect();
        let context = classifier().build_context("latest", &history, &ChannelMetadata::default());

        assert!(!context.contains("message 6"));
        assert!(context.contains("message 7"));
        assert!(context.contains("message 11"));
    }

    #[test]
    fn context_omits_history_section_when_empty() {
        let context = classifier().build_context("hello", &[], &ChannelMetadata::default());
        assert!(!context.contains("Previous messages"));
    }
}

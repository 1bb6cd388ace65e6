//! Mock classifier and responder for testing.
//!
//! Configurable mocks so tests can run the full orchestration flow
//! without calling a real LLM: queued results consumed in order, error
//! injection, and call tracking for verification.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::ChannelMetadata;
use crate::domain::session::{Message, TranscriptEntry};
use crate::ports::{
    ClassifierError, PersonaResponder, ReplyIntent, ResponderError, ScamClassifier, ScamVerdict,
};

/// Mock scam classifier with queued verdicts.
///
/// Once the queue is exhausted, every call returns the default verdict.
#[derive(Debug, Clone)]
pub struct MockScamClassifier {
    verdicts: Arc<Mutex<VecDeque<Result<ScamVerdict, String>>>>,
    default_verdict: ScamVerdict,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockScamClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScamClassifier {
    /// Creates a mock whose default verdict is clean.
    pub fn new() -> Self {
        Self {
            verdicts: Arc::new(Mutex::new(VecDeque::new())),
            default_verdict: ScamVerdict::clean(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a verdict to return on the next call.
    pub fn with_verdict(self, is_scam: bool, confidence: f64) -> Self {
        self.verdicts
            .lock()
            .unwrap()
            .push_back(Ok(ScamVerdict::new(is_scam, confidence)));
        self
    }

    /// Queues a failure for the next call.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.verdicts
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
        self
    }

    /// Sets the verdict returned once the queue is exhausted.
    pub fn with_default_verdict(mut self, is_scam: bool, confidence: f64) -> Self {
        self.default_verdict = ScamVerdict::new(is_scam, confidence);
        self
    }

    /// Returns the number of classification calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns the messages passed to classify, in order.
    pub fn classified_messages(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScamClassifier for MockScamClassifier {
    async fn classify(
        &self,
        message: &str,
        _history: &[TranscriptEntry],
        _metadata: &ChannelMetadata,
    ) -> Result<ScamVerdict, ClassifierError> {
        self.calls.lock().unwrap().push(message.to_string());

        match self.verdicts.lock().unwrap().pop_front() {
            Some(Ok(verdict)) => Ok(verdict),
            Some(Err(message)) => Err(ClassifierError::Unavailable(message)),
            None => Ok(self.default_verdict),
        }
    }
}

/// Mock persona responder with queued replies.
///
/// Once the queue is exhausted, replies are synthesized from the intent
/// so multi-turn tests don't need to queue every reply.
#[derive(Debug, Clone, Default)]
pub struct MockPersonaResponder {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<ReplyIntent>>>,
}

impl MockPersonaResponder {
    /// Creates a mock responder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply to return on the next call.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
        self
    }

    /// Queues a failure for the next call.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// Returns the intents requested, in order.
    pub fn requested_intents(&self) -> Vec<ReplyIntent> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the number of generate calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PersonaResponder for MockPersonaResponder {
    async fn generate(
        &self,
        intent: ReplyIntent,
        _transcript: &[Message],
        _metadata: &ChannelMetadata,
    ) -> Result<String, ResponderError> {
        self.calls.lock().unwrap().push(intent);

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ResponderError::Unavailable(message)),
            None => Ok(format!("mock {:?} reply", intent)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ChannelMetadata {
        ChannelMetadata::default()
    }

    #[tokio::test]
    async fn classifier_returns_queued_verdicts_in_order() {
        let classifier = MockScamClassifier::new()
            .with_verdict(false, 0.3)
            .with_verdict(true, 0.9);

        let first = classifier.classify("a", &[], &meta()).await.unwrap();
        let second = classifier.classify("b", &[], &meta()).await.unwrap();

        assert!(!first.is_scam);
        assert!(second.is_scam);
        assert_eq!(classifier.call_count(), 2);
    }

    #[tokio::test]
    async fn classifier_falls_back_to_default_verdict() {
        let classifier = MockScamClassifier::new().with_default_verdict(true, 0.8);
        let verdict = classifier.classify("a", &[], &meta()).await.unwrap();
        assert!(verdict.is_scam);
    }

    #[tokio::test]
    async fn classifier_injects_errors() {
        let classifier = MockScamClassifier::new().with_error("down");
        let result = classifier.classify("a", &[], &meta()).await;
        assert!(matches!(result, Err(ClassifierError::Unavailable(_))));
    }

    #[tokio::test]
    async fn classifier_records_messages() {
        let classifier = MockScamClassifier::new();
        classifier.classify("first", &[], &meta()).await.unwrap();
        classifier.classify("second", &[], &meta()).await.unwrap();
        assert_eq!(classifier.classified_messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn responder_returns_queued_replies_then_synthesizes() {
        let responder = MockPersonaResponder::new().with_reply("queued");

        let first = responder
            .generate(ReplyIntent::Initial, &[], &meta())
            .await
            .unwrap();
        let second = responder
            .generate(ReplyIntent::Ongoing, &[], &meta())
            .await
            .unwrap();

        assert_eq!(first, "queued");
        assert!(second.contains("Ongoing"));
    }

    #[tokio::test]
    async fn responder_tracks_intents() {
        let responder = MockPersonaResponder::new();
        responder
            .generate(ReplyIntent::Neutral, &[], &meta())
            .await
            .unwrap();
        responder
            .generate(ReplyIntent::Final, &[], &meta())
            .await
            .unwrap();

        assert_eq!(
            responder.requested_intents(),
            vec![ReplyIntent::Neutral, ReplyIntent::Final]
        );
    }

    #[tokio::test]
    async fn responder_injects_errors() {
        let responder = MockPersonaResponder::new().with_error("down");
        let result = responder.generate(ReplyIntent::Initial, &[], &meta()).await;
        assert!(matches!(result, Err(ResponderError::Unavailable(_))));
    }
}

//! Session Orchestrator - the state machine driving each conversation.
//!
//! One inbound message is one turn. A turn acquires the session's lock,
//! appends the message, and branches on the session's phase:
//!
//! - `New`/`Undetected`: run the classifier. Above threshold, the session
//!   moves to `Engaging` with an initial persona reply; otherwise a
//!   neutral reply goes out and nothing else changes.
//! - `Engaging`: evaluate the conclusion policy first. If it fires, the
//!   session concludes: a final reply goes out and the report handoff is
//!   spawned. Otherwise an ongoing reply goes out and the inbound text is
//!   mined into the intelligence bundle.
//! - `Concluding`/`Closed`: a final-style reply goes out; no mutation and
//!   never a second handoff.
//!
//! External failures are never fatal to a turn: classifier errors become
//! a clean verdict, responder errors become a fixed filler reply, and a
//! failed report delivery leaves `callback_sent` false permanently.

use std::sync::Arc;

use crate::domain::foundation::{ChannelMetadata, SessionId};
use crate::domain::intelligence::{self, IntelligenceBundle};
use crate::domain::session::{
    ConclusionPolicy, EngagementPhase, SenderRole, Session, TranscriptEntry,
    DEFAULT_DETECTION_THRESHOLD,
};
use crate::ports::{
    PersonaResponder, ReplyIntent, ReportSink, ScamClassifier, ScamVerdict, SessionStore,
};

use super::report::build_report;

/// Reply used whenever the responder fails.
const FALLBACK_REPLY: &str =
    "Sorry, I am having some network issue. Can you please repeat that?";

/// One inbound turn as consumed by the orchestrator.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Which conversation this belongs to.
    pub session_id: SessionId,
    /// Who sent the message.
    pub sender: SenderRole,
    /// The message text.
    pub text: String,
    /// Caller-supplied timestamp (epoch milliseconds).
    pub external_timestamp: i64,
    /// Full prior conversation as the caller sees it. May be redundant
    /// with the store's own log; used for classifier context and to seed
    /// an empty log.
    pub history: Vec<TranscriptEntry>,
    /// Channel metadata.
    pub metadata: ChannelMetadata,
}

/// The outcome of one processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The reply to send back.
    pub reply: String,
    /// The session's phase after this turn.
    pub phase: EngagementPhase,
}

/// The state machine over the store, classifier, responder, and sink.
pub struct EngagementOrchestrator {
    store: Arc<dyn SessionStore>,
    classifier: Arc<dyn ScamClassifier>,
    responder: Arc<dyn PersonaResponder>,
    sink: Arc<dyn ReportSink>,
    detection_threshold: f64,
    policy: ConclusionPolicy,
}

impl EngagementOrchestrator {
    /// Creates an orchestrator with the default policy constants.
    pub fn new(
        store: Arc<dyn SessionStore>,
        classifier: Arc<dyn ScamClassifier>,
        responder: Arc<dyn PersonaResponder>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            store,
            classifier,
            responder,
            sink,
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            policy: ConclusionPolicy::default(),
        }
    }

    /// Overrides the detection threshold.
    pub fn with_detection_threshold(mut self, threshold: f64) -> Self {
        self.detection_threshold = threshold;
        self
    }

    /// Overrides the conclusion policy.
    pub fn with_policy(mut self, policy: ConclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Processes one inbound turn and produces the reply.
    ///
    /// Turns for the same session serialize on the store's per-session
    /// lock; turns for different sessions run in parallel.
    pub async fn handle_message(&self, inbound: InboundMessage) -> TurnOutcome {
        let id = inbound.session_id.clone();
        let _turn_guard = self.store.lock(&id).await;

        let existing = self.store.get_or_create(&id).await;
        if existing.total_messages() == 0 && !inbound.history.is_empty() {
            self.seed_history(&id, &inbound.history).await;
        }

        let session = self
            .store
            .append_message(&id, inbound.sender, &inbound.text, inbound.external_timestamp)
            .await;

        match session.phase() {
            EngagementPhase::New | EngagementPhase::Undetected => {
                self.handle_undetected(&inbound, session).await
            }
            EngagementPhase::Engaging => self.handle_engaging(&inbound, session).await,
            EngagementPhase::Concluding | EngagementPhase::Closed => {
                self.handle_post_conclusion(&inbound, session).await
            }
        }
    }

    async fn handle_undetected(&self, inbound: &InboundMessage, session: Session) -> TurnOutcome {
        let verdict = match self
            .classifier
            .classify(&inbound.text, &inbound.history, &inbound.metadata)
            .await
        {
            Ok(verdict) => verdict,
            Err(error) => {
                tracing::warn!(
                    session_id = %session.id(),
                    %error,
                    "classifier failed, treating message as clean"
                );
                ScamVerdict::clean()
            }
        };

        if verdict.clears(self.detection_threshold) {
            self.store
                .mark_detected(session.id(), verdict.confidence)
                .await;
            self.store.engage_agent(session.id()).await;
            tracing::info!(
                session_id = %session.id(),
                confidence = verdict.confidence,
                "scam detected, persona engaged"
            );

            let reply = self
                .generate_reply(ReplyIntent::Initial, &session, &inbound.metadata)
                .await;
            return TurnOutcome {
                reply,
                phase: EngagementPhase::Engaging,
            };
        }

        let reply = self
            .generate_reply(ReplyIntent::Neutral, &session, &inbound.metadata)
            .await;
        TurnOutcome {
            reply,
            phase: EngagementPhase::Undetected,
        }
    }

    async fn handle_engaging(&self, inbound: &InboundMessage, session: Session) -> TurnOutcome {
        if self
            .policy
            .should_conclude(&session, IntelligenceBundle::is_high_value)
        {
            self.store.mark_concluded(session.id()).await;
            tracing::info!(
                session_id = %session.id(),
                total_messages = session.total_messages(),
                high_value = session.intelligence().is_high_value(),
                "engagement concluded"
            );

            let reply = self
                .generate_reply(ReplyIntent::Final, &session, &inbound.metadata)
                .await;
            self.spawn_report_handoff(session.id().clone()).await;

            return TurnOutcome {
                reply,
                phase: EngagementPhase::Concluding,
            };
        }

        let reply = self
            .generate_reply(ReplyIntent::Ongoing, &session, &inbound.metadata)
            .await;

        let mined = intelligence::extract_from_text(&inbound.text);
        if !mined.is_empty() {
            tracing::debug!(session_id = %session.id(), "merging extracted intelligence");
            self.store.merge_intelligence(session.id(), &mined).await;
        }

        TurnOutcome {
            reply,
            phase: EngagementPhase::Engaging,
        }
    }

    async fn handle_post_conclusion(
        &self,
        inbound: &InboundMessage,
        session: Session,
    ) -> TurnOutcome {
        // The conversation is over from our side; keep replying in
        // character but never restart extraction or delivery.
        let phase = session.phase();
        let reply = self
            .generate_reply(ReplyIntent::Final, &session, &inbound.metadata)
            .await;
        TurnOutcome { reply, phase }
    }

    async fn generate_reply(
        &self,
        intent: ReplyIntent,
        session: &Session,
        metadata: &ChannelMetadata,
    ) -> String {
        match self
            .responder
            .generate(intent, session.messages(), metadata)
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(
                    session_id = %session.id(),
                    ?intent,
                    %error,
                    "responder failed, using filler reply"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn seed_history(&self, id: &SessionId, history: &[TranscriptEntry]) {
        tracing::debug!(
            session_id = %id,
            entries = history.len(),
            "seeding empty session log from caller history"
        );
        for entry in history {
            self.store
                .append_message(id, entry.sender, &entry.text, entry.timestamp.unwrap_or(0))
                .await;
        }
    }

    /// Hands the concluded session off to the report sink without
    /// blocking the reply. `callback_sent` flips only when the sink
    /// acknowledges; a failed delivery is logged and never retried.
    async fn spawn_report_handoff(&self, id: SessionId) {
        let Some(snapshot) = self.store.find(&id).await else {
            return;
        };
        let report = build_report(&snapshot);
        let sink = Arc::clone(&self.sink);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match sink.deliver(&report).await {
                Ok(()) => {
                    store.mark_callback_sent(&id).await;
                    tracing::info!(session_id = %id, "final report delivered");
                }
                Err(error) => {
                    tracing::error!(session_id = %id, %error, "final report delivery failed");
                }
            }
        });
    }
}

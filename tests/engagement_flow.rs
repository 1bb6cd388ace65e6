//! Integration tests for the full engagement lifecycle.
//!
//! These wire the orchestrator against the in-memory store and mock
//! classifier/responder/sink, then walk realistic conversations through
//! every phase: undetected small talk, detection, engagement with
//! intelligence drip, conclusion, report delivery, and post-conclusion
//! turns.

use std::sync::Arc;
use std::time::Duration;

use scambait::adapters::ai::{MockPersonaResponder, MockScamClassifier};
use scambait::adapters::report::InMemoryReportSink;
use scambait::adapters::store::InMemorySessionStore;
use scambait::application::{EngagementOrchestrator, InboundMessage};
use scambait::domain::foundation::{ChannelMetadata, SessionId};
use scambait::domain::session::{EngagementPhase, SenderRole};
use scambait::ports::ReplyIntent;
use scambait::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct World {
    orchestrator: EngagementOrchestrator,
    store: Arc<InMemorySessionStore>,
    responder: MockPersonaResponder,
    sink: InMemoryReportSink,
}

impl World {
    fn new(classifier: MockScamClassifier) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let responder = MockPersonaResponder::new();
        let sink = InMemoryReportSink::new();
        let orchestrator = EngagementOrchestrator::new(
            store.clone(),
            Arc::new(classifier),
            Arc::new(responder.clone()),
            Arc::new(sink.clone()),
        );
        Self {
            orchestrator,
            store,
            responder,
            sink,
        }
    }

    async fn turn(&self, session: &str, text: &str) -> scambait::application::TurnOutcome {
        self.orchestrator
            .handle_message(InboundMessage {
                session_id: SessionId::new(session).unwrap(),
                sender: SenderRole::Scammer,
                text: text.to_string(),
                external_timestamp: 1_700_000_000_000,
                history: Vec::new(),
                metadata: ChannelMetadata::default(),
            })
            .await
    }

    async fn session(&self, id: &str) -> scambait::domain::session::Session {
        self.store
            .find(&SessionId::new(id).unwrap())
            .await
            .expect("session should exist")
    }

    async fn wait_for_callback(&self, id: &str) {
        let session_id = SessionId::new(id).unwrap();
        for _ in 0..100 {
            if let Some(session) = self.store.find(&session_id).await {
                if session.callback_sent() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("callback was never marked sent for {id}");
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn full_lifecycle_from_small_talk_to_closed() {
    // First turn is benign, second clears the threshold, then the scammer
    // drips a payment handle and the conversation runs to the value exit.
    let world = World::new(
        MockScamClassifier::new()
            .with_verdict(false, 0.2)
            .with_verdict(true, 0.88),
    );

    let hello = world.turn("case-1", "hello, how are you?").await;
    assert_eq!(hello.phase, EngagementPhase::Undetected);

    let hook = world
        .turn("case-1", "Sir your SBI account will be blocked today, verify KYC")
        .await;
    assert_eq!(hook.phase, EngagementPhase::Engaging);

    // Intelligence arrives on the first engaged turn.
    world
        .turn("case-1", "Pay the verification fee to 9876543210@paytm")
        .await;

    // Filler turns until the 8-message engagement floor is met.
    for i in 0..6 {
        let outcome = world.turn("case-1", &format!("Why the delay? {i}")).await;
        assert_eq!(outcome.phase, EngagementPhase::Engaging);
    }

    // 8th post-engagement message: floor met, handle forces the exit.
    let closing = world.turn("case-1", "Send now or police case").await;
    assert_eq!(closing.phase, EngagementPhase::Concluding);

    world.wait_for_callback("case-1").await;
    let session = world.session("case-1").await;
    assert_eq!(session.phase(), EngagementPhase::Closed);
    assert!(session.concluded());
    assert!(session.callback_sent());

    // One delivery, carrying the mined handle.
    assert_eq!(world.sink.delivery_count(), 1);
    let report = &world.sink.delivered()[0];
    assert!(report.scam_detected);
    assert!(report
        .intelligence
        .payment_handles
        .contains("9876543210@paytm"));
    assert!(report.summary.contains("1 payment handles"));

    // The whole conversation used the expected reply intents.
    let intents = world.responder.requested_intents();
    assert_eq!(intents[0], ReplyIntent::Neutral);
    assert_eq!(intents[1], ReplyIntent::Initial);
    assert!(intents[2..intents.len() - 1]
        .iter()
        .all(|i| *i == ReplyIntent::Ongoing));
    assert_eq!(*intents.last().unwrap(), ReplyIntent::Final);
}

#[tokio::test]
async fn benign_conversation_never_engages() {
    let world = World::new(MockScamClassifier::new());

    for i in 0..20 {
        let outcome = world.turn("friendly", &format!("nice weather today {i}")).await;
        assert_eq!(outcome.phase, EngagementPhase::Undetected);
    }

    let session = world.session("friendly").await;
    assert!(!session.scam_detected());
    assert!(!session.concluded());
    assert_eq!(world.sink.delivery_count(), 0);
}

#[tokio::test]
async fn borderline_confidence_does_not_engage() {
    // 0.65 is under the 0.7 bar; the session stays undetected and no
    // detection state is written.
    let world = World::new(MockScamClassifier::new().with_verdict(true, 0.65));

    let outcome = world.turn("border", "you won a lottery prize!").await;

    assert_eq!(outcome.phase, EngagementPhase::Undetected);
    let session = world.session("border").await;
    assert!(!session.scam_detected());
    assert_eq!(session.scam_confidence(), 0.0);
    assert!(!session.agent_engaged());
}

#[tokio::test]
async fn ceiling_exit_fires_with_empty_bundle() {
    let world = World::new(MockScamClassifier::new().with_verdict(true, 0.95));

    for i in 0..14 {
        let outcome = world.turn("ceiling", &format!("threats without specifics {i}")).await;
        assert_ne!(outcome.phase, EngagementPhase::Concluding);
    }
    let final_turn = world.turn("ceiling", "last warning!").await;
    assert_eq!(final_turn.phase, EngagementPhase::Concluding);

    world.wait_for_callback("ceiling").await;
    let report = &world.sink.delivered()[0];
    assert_eq!(report.total_messages, 15);
    assert!(report.intelligence.payment_handles.is_empty());
}

#[tokio::test]
async fn intelligence_accumulates_across_turns_without_duplicates() {
    let world = World::new(MockScamClassifier::new().with_verdict(true, 0.9));

    world.turn("accum", "your parcel is held at customs").await;
    world.turn("accum", "call 9876543210 to release it").await;
    world.turn("accum", "again: call 98765 43210 now").await;
    world.turn("accum", "or pay at www.release-parcel.example/pay").await;

    let session = world.session("accum").await;
    let intel = session.intelligence();
    assert_eq!(intel.phone_numbers.len(), 1);
    assert!(intel.phone_numbers.contains("9876543210"));
    assert!(intel.links.contains("www.release-parcel.example/pay"));
    assert!(intel.keywords.contains("parcel"));
}

#[tokio::test]
async fn post_conclusion_turns_reply_in_character_once() {
    let world = World::new(MockScamClassifier::new().with_verdict(true, 0.9));

    for i in 0..15 {
        world.turn("after", &format!("message {i}")).await;
    }
    world.wait_for_callback("after").await;

    let extra = world.turn("after", "hello? are you still there?").await;
    assert_eq!(extra.phase, EngagementPhase::Closed);
    assert!(!extra.reply.is_empty());

    // Still exactly one report.
    assert_eq!(world.sink.delivery_count(), 1);

    // The extra message is logged but mined nowhere.
    let session = world.session("after").await;
    assert_eq!(session.total_messages(), 16);
}

// =============================================================================
// Failure behavior
// =============================================================================

#[tokio::test]
async fn failed_delivery_keeps_session_concluded_but_unclosed() {
    let store = Arc::new(InMemorySessionStore::new());
    let sink = InMemoryReportSink::failing();
    let orchestrator = EngagementOrchestrator::new(
        store.clone(),
        Arc::new(MockScamClassifier::new().with_verdict(true, 0.9)),
        Arc::new(MockPersonaResponder::new()),
        Arc::new(sink.clone()),
    );

    for i in 0..15 {
        orchestrator
            .handle_message(InboundMessage {
                session_id: SessionId::new("fail").unwrap(),
                sender: SenderRole::Scammer,
                text: format!("message {i}"),
                external_timestamp: 0,
                history: Vec::new(),
                metadata: ChannelMetadata::default(),
            })
            .await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let session = store.find(&SessionId::new("fail").unwrap()).await.unwrap();
    assert!(session.concluded());
    assert!(!session.callback_sent());
    assert_eq!(session.phase(), EngagementPhase::Concluding);
    assert_eq!(sink.delivery_count(), 0);

    // The intelligence is still held in the session itself.
    assert_eq!(session.total_messages(), 15);
}

#[tokio::test]
async fn classifier_outage_degrades_to_neutral_replies() {
    let world = World::new(
        MockScamClassifier::new()
            .with_error("inference service down")
            .with_error("still down")
            .with_verdict(true, 0.9),
    );

    // Two failed classifications stay undetected.
    assert_eq!(
        world.turn("outage", "you won a prize").await.phase,
        EngagementPhase::Undetected
    );
    assert_eq!(
        world.turn("outage", "claim immediately").await.phase,
        EngagementPhase::Undetected
    );

    // Recovery on the third turn engages as usual.
    assert_eq!(
        world.turn("outage", "send OTP to claim").await.phase,
        EngagementPhase::Engaging
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn parallel_sessions_do_not_interfere() {
    let world = Arc::new(World::new(
        // One verdict per session's first turn, alternating outcomes.
        MockScamClassifier::new().with_default_verdict(true, 0.9),
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let world = world.clone();
        handles.push(tokio::spawn(async move {
            let id = format!("parallel-{i}");
            for turn in 0..5 {
                world.turn(&id, &format!("message {turn}")).await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(world.store.session_count().await, 8);
    for i in 0..8 {
        let session = world.session(&format!("parallel-{i}")).await;
        assert_eq!(session.total_messages(), 5);
        assert!(session.agent_engaged());
        assert!(!session.concluded());
    }
}

#[tokio::test]
async fn same_session_turns_serialize_in_order() {
    let world = Arc::new(World::new(MockScamClassifier::new()));

    let mut handles = Vec::new();
    for i in 0..10 {
        let world = world.clone();
        handles.push(tokio::spawn(async move {
            world.turn("serial", &format!("turn {i}")).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let session = world.session("serial").await;
    assert_eq!(session.total_messages(), 10);

    // Sequence numbers are gapless and strictly increasing no matter how
    // the tasks interleaved.
    let seqs: Vec<u64> = session.messages().iter().map(|m| m.seq()).collect();
    assert_eq!(seqs, (0..10).collect::<Vec<u64>>());
}

// =============================================================================
// History reconciliation
// =============================================================================

#[tokio::test]
async fn restart_recovery_counts_seeded_history_toward_the_ceiling() {
    // Simulates a caller resending full history after this service lost
    // its in-memory state: the seeded log plus the live turn resume the
    // conversation where it left off.
    let world = World::new(MockScamClassifier::new().with_verdict(true, 0.9));

    let history: Vec<scambait::domain::session::TranscriptEntry> = (0..6)
        .map(|i| scambait::domain::session::TranscriptEntry {
            sender: SenderRole::Scammer,
            text: format!("old message {i}"),
            timestamp: Some(i),
        })
        .collect();

    world
        .orchestrator
        .handle_message(InboundMessage {
            session_id: SessionId::new("restarted").unwrap(),
            sender: SenderRole::Scammer,
            text: "are you still there?".to_string(),
            external_timestamp: 100,
            history,
            metadata: ChannelMetadata::default(),
        })
        .await;

    let session = world.session("restarted").await;
    assert_eq!(session.total_messages(), 7);
    assert_eq!(session.messages()[0].text(), "old message 0");
    assert_eq!(session.messages()[6].text(), "are you still there?");
}

//! Session aggregate entity.
//!
//! A session is the full state of one scammer-facing conversation: the
//! append-only message log, the detection and engagement flags, the
//! accumulated intelligence, and the conclusion bookkeeping.
//!
//! # Invariants
//!
//! - `agent_engaged` implies `scam_detected`
//! - `concluded` is monotonic: once true it never resets
//! - `callback_sent` is set at most once
//! - the message log is append-only, ordered by receipt; sequence numbers
//!   are strictly increasing

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::intelligence::IntelligenceBundle;
use serde::{Deserialize, Serialize};

use super::{EngagementPhase, Message, SenderRole};

/// One scammer-facing conversation and everything learned from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Caller-supplied opaque identifier.
    id: SessionId,

    /// When the session was first seen.
    created_at: Timestamp,

    /// Append-only message log in receipt order.
    messages: Vec<Message>,

    /// Whether the external classifier has confirmed a scam.
    scam_detected: bool,

    /// Classifier confidence at detection time, in [0, 1].
    scam_confidence: f64,

    /// When the scam was detected.
    detected_at: Option<Timestamp>,

    /// Whether the persona responder is active.
    agent_engaged: bool,

    /// When the persona was activated.
    engaged_at: Option<Timestamp>,

    /// Sequence number the first post-engagement message will carry.
    /// Engagement counting compares against this instead of wall-clock
    /// receipt times, so slow turns cannot skew the floor.
    engaged_at_seq: Option<u64>,

    /// Whether the conclusion policy has fired. Sticky.
    concluded: bool,

    /// When the session concluded.
    concluded_at: Option<Timestamp>,

    /// Whether the final report was delivered and acknowledged.
    callback_sent: bool,

    /// When the final report was acknowledged.
    callback_sent_at: Option<Timestamp>,

    /// Intelligence accumulated across all turns.
    intelligence: IntelligenceBundle,

    /// Next sequence number to assign. Strictly monotonic.
    next_seq: u64,
}

impl Session {
    /// Creates a fresh session: no messages, all flags false, empty bundle.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Timestamp::now(),
            messages: Vec::new(),
            scam_detected: false,
            scam_confidence: 0.0,
            detected_at: None,
            agent_engaged: false,
            engaged_at: None,
            engaged_at_seq: None,
            concluded: false,
            concluded_at: None,
            callback_sent: false,
            callback_sent_at: None,
            intelligence: IntelligenceBundle::new(),
            next_seq: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns when the session was first seen.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns the message log in receipt order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the total number of messages in the log.
    pub fn total_messages(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the classifier has confirmed a scam.
    pub fn scam_detected(&self) -> bool {
        self.scam_detected
    }

    /// Returns the classifier confidence recorded at detection.
    pub fn scam_confidence(&self) -> f64 {
        self.scam_confidence
    }

    /// Returns when the scam was detected.
    pub fn detected_at(&self) -> Option<&Timestamp> {
        self.detected_at.as_ref()
    }

    /// Returns true if the persona responder is active.
    pub fn agent_engaged(&self) -> bool {
        self.agent_engaged
    }

    /// Returns when the persona was activated.
    pub fn engaged_at(&self) -> Option<&Timestamp> {
        self.engaged_at.as_ref()
    }

    /// Returns true if the conclusion policy has fired.
    pub fn concluded(&self) -> bool {
        self.concluded
    }

    /// Returns true if the final report was delivered.
    pub fn callback_sent(&self) -> bool {
        self.callback_sent
    }

    /// Returns the accumulated intelligence.
    pub fn intelligence(&self) -> &IntelligenceBundle {
        &self.intelligence
    }

    /// Returns the number of messages appended after engagement.
    ///
    /// Zero when the persona has not been activated. The message that
    /// triggered detection precedes engagement and does not count.
    pub fn messages_since_engagement(&self) -> usize {
        match self.engaged_at_seq {
            Some(floor) => self.messages.iter().filter(|m| m.seq() >= floor).count(),
            None => 0,
        }
    }

    /// Derives the lifecycle phase from the session flags.
    pub fn phase(&self) -> EngagementPhase {
        if self.callback_sent {
            EngagementPhase::Closed
        } else if self.concluded {
            EngagementPhase::Concluding
        } else if self.agent_engaged {
            EngagementPhase::Engaging
        } else if self.messages.is_empty() {
            EngagementPhase::New
        } else {
            EngagementPhase::Undetected
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Appends a message to the log, assigning the next sequence number
    /// and the receipt timestamp. Touches no other field.
    pub fn record_message(
        &mut self,
        sender: SenderRole,
        text: impl Into<String>,
        external_timestamp: i64,
    ) -> &Message {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.messages
            .push(Message::received(sender, text, external_timestamp, seq));
        self.messages.last().expect("just pushed")
    }

    /// Marks the session as a confirmed scam. Idempotent; calling again
    /// overwrites the confidence and timestamp (last write wins).
    pub fn mark_detected(&mut self, confidence: f64) {
        self.scam_detected = true;
        self.scam_confidence = confidence.clamp(0.0, 1.0);
        self.detected_at = Some(Timestamp::now());
    }

    /// Activates the persona responder and starts the engagement clock.
    ///
    /// Callers must ensure `scam_detected` is already true. Messages
    /// appended from this point on count toward the engagement floor.
    pub fn engage_agent(&mut self) {
        debug_assert!(self.scam_detected, "engage_agent before mark_detected");
        self.agent_engaged = true;
        self.engaged_at = Some(Timestamp::now());
        self.engaged_at_seq = Some(self.next_seq);
    }

    /// Merges newly extracted intelligence into the session's bundle.
    pub fn merge_intelligence(&mut self, bundle: &IntelligenceBundle) {
        self.intelligence.merge(bundle);
    }

    /// Marks the session as concluded. One-way: later calls are no-ops.
    pub fn mark_concluded(&mut self) {
        if !self.concluded {
            self.concluded = true;
            self.concluded_at = Some(Timestamp::now());
        }
    }

    /// Records that the final report was delivered. One-way: the first
    /// acknowledgement wins and later calls are no-ops.
    pub fn mark_callback_sent(&mut self) {
        if !self.callback_sent {
            self.callback_sent = true;
            self.callback_sent_at = Some(Timestamp::now());
        }
    }
}

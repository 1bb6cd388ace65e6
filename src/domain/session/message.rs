//! Message entity for honeypot sessions.
//!
//! Messages are immutable records of conversation turns. Each carries the
//! caller's own timestamp and an internal receipt timestamp, plus a
//! per-session sequence number assigned at append time. Ordering within a
//! session is receipt order, which the sequence number makes explicit.

use crate::domain::foundation::{MessageId, Timestamp};
use serde::{Deserialize, Serialize};

/// Role of a message sender in a honeypot conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    /// The suspected scammer on the other end.
    Scammer,
    /// Our side of the conversation (the persona, or the real user
    /// before detection). Callers may send this as `"user"`.
    #[serde(alias = "user", alias = "agent")]
    Defender,
}

impl SenderRole {
    /// Returns true if this message came from the suspected scammer.
    pub fn is_scammer(&self) -> bool {
        matches!(self, Self::Scammer)
    }
}

/// An immutable message within a session.
///
/// # Invariants
///
/// - `seq` is strictly increasing within a session, assigned at append time
/// - `received_at` is set at construction and never changes
/// - `external_timestamp` is the caller's claim, stored verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    id: MessageId,

    /// Who sent the message.
    sender: SenderRole,

    /// The message text.
    text: String,

    /// Caller-supplied timestamp (epoch milliseconds), stored as-is.
    external_timestamp: i64,

    /// When this service received the message.
    received_at: Timestamp,

    /// Per-session monotonic sequence number.
    seq: u64,
}

impl Message {
    /// Creates a message at receipt time. The sequence number comes from
    /// the owning session's counter.
    pub fn received(sender: SenderRole, text: impl Into<String>, external_timestamp: i64, seq: u64) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            text: text.into(),
            external_timestamp,
            received_at: Timestamp::now(),
            seq,
        }
    }

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the sender role.
    pub fn sender(&self) -> SenderRole {
        self.sender
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the caller-supplied timestamp (epoch milliseconds).
    pub fn external_timestamp(&self) -> i64 {
        self.external_timestamp
    }

    /// Returns when this service received the message.
    pub fn received_at(&self) -> &Timestamp {
        &self.received_at
    }

    /// Returns the per-session sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// A caller-supplied transcript entry from the inbound envelope.
///
/// Looser than [`Message`]: no identity, no receipt metadata. Used for
/// classifier context and for seeding an empty session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub sender: SenderRole,
    pub text: String,
    /// Caller timestamp (epoch milliseconds), if supplied.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

//! Engagement phases of a honeypot session.
//!
//! Phases are derived from session flags rather than stored separately,
//! so they can never disagree with the underlying state. The lifecycle
//! only moves forward: once a session concludes it never re-engages.

use serde::{Deserialize, Serialize};

/// The lifecycle phase of a honeypot session.
///
/// Phases flow strictly forward:
/// `New` → `Undetected` → `Engaging` → `Concluding` → `Closed`
///
/// `Undetected` and `Engaging` loop on themselves while turns arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementPhase {
    /// Session exists but no messages have arrived yet.
    New,

    /// Messages are arriving but no scam has been detected.
    /// Replies are neutral; the classifier runs on every turn.
    Undetected,

    /// Scam confirmed, persona responder active, intelligence being mined.
    Engaging,

    /// Conclusion policy fired; final reply sent, report handoff in flight.
    Concluding,

    /// Final report delivered and acknowledged.
    Closed,
}

impl EngagementPhase {
    /// Returns true if the persona responder drives replies in this phase.
    pub fn is_persona_active(&self) -> bool {
        matches!(self, Self::Engaging | Self::Concluding | Self::Closed)
    }

    /// Returns true if the session still accepts meaningful work
    /// (classification or extraction) on inbound turns.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::Undetected | Self::Engaging)
    }

    /// Returns all valid next phases from this phase.
    pub fn valid_next_phases(&self) -> Vec<Self> {
        match self {
            Self::New => vec![Self::Undetected, Self::Engaging],
            Self::Undetected => vec![Self::Undetected, Self::Engaging],
            Self::Engaging => vec![Self::Engaging, Self::Concluding],
            Self::Concluding => vec![Self::Closed],
            Self::Closed => vec![],
        }
    }

    /// Returns true if transition to the target phase is valid.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_next_phases().contains(target)
    }
}

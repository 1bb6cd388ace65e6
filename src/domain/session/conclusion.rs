//! Conclusion policy: decides when an engagement has run its course.
//!
//! The decision is pure over a session snapshot. Persisting a `true`
//! verdict (so the sticky rule holds on later turns) is the caller's job
//! via `Session::mark_concluded`.

use crate::domain::intelligence::IntelligenceBundle;
use serde::{Deserialize, Serialize};

use super::Session;

/// Default classifier confidence required to start engagement.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.7;

/// Default minimum number of post-engagement messages before concluding.
pub const DEFAULT_MIN_ENGAGEMENT_MESSAGES: usize = 8;

/// Default hard ceiling on total conversation length.
pub const DEFAULT_MAX_TOTAL_MESSAGES: usize = 15;

/// Policy constants governing when a session concludes.
///
/// The defaults are fixed behavioral constants; deployments may override
/// them but parity with the reference behavior requires 8 and 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConclusionPolicy {
    /// Messages that must arrive after engagement before any exit.
    pub min_engagement_messages: usize,

    /// Total conversation length that forces an exit regardless of
    /// intelligence value.
    pub max_total_messages: usize,
}

impl Default for ConclusionPolicy {
    fn default() -> Self {
        Self {
            min_engagement_messages: DEFAULT_MIN_ENGAGEMENT_MESSAGES,
            max_total_messages: DEFAULT_MAX_TOTAL_MESSAGES,
        }
    }
}

impl ConclusionPolicy {
    /// Decides whether the session should conclude now.
    ///
    /// In order:
    /// 1. An already-concluded session stays concluded (sticky).
    /// 2. No conclusion before engagement.
    /// 3. The engagement floor must be met: at least
    ///    `min_engagement_messages` messages after the persona activated.
    ///    The floor is counted by sequence number, so the clock starts at
    ///    engagement, not at conversation start.
    /// 4. Then either exit: the intelligence predicate is satisfied
    ///    (value-driven), or the whole conversation has reached
    ///    `max_total_messages` (hard ceiling).
    pub fn should_conclude<F>(&self, session: &Session, is_high_value: F) -> bool
    where
        F: Fn(&IntelligenceBundle) -> bool,
    {
        if session.concluded() {
            return true;
        }

        if !session.agent_engaged() {
            return false;
        }

        if session.messages_since_engagement() < self.min_engagement_messages {
            return false;
        }

        is_high_value(session.intelligence()) || session.total_messages() >= self.max_total_messages
    }
}

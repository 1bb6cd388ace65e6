//! Session domain: the state of one scammer-facing conversation.

mod conclusion;
mod message;
mod phase;
#[allow(clippy::module_inception)]
mod session;

pub use conclusion::{
    ConclusionPolicy, DEFAULT_DETECTION_THRESHOLD, DEFAULT_MAX_TOTAL_MESSAGES,
    DEFAULT_MIN_ENGAGEMENT_MESSAGES,
};
pub use message::{Message, SenderRole, TranscriptEntry};
pub use phase::EngagementPhase;
pub use session::Session;

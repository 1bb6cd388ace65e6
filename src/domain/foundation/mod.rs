//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod metadata;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{MessageId, SessionId};
pub use metadata::ChannelMetadata;
pub use timestamp::Timestamp;

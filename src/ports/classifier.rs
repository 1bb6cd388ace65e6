//! Scam Classifier Port - Interface for the external scam classifier.
//!
//! The classifier is a black box (in practice an LLM behind an HTTP API).
//! The core only consumes its verdict; accuracy is entirely the
//! classifier's problem. The orchestrator treats any error as a clean
//! verdict, so classifier failure is never fatal to a turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ChannelMetadata;
use crate::domain::session::TranscriptEntry;

/// Port for scam classification.
#[async_trait]
pub trait ScamClassifier: Send + Sync {
    /// Classifies a single inbound message in the context of the
    /// conversation so far.
    async fn classify(
        &self,
        message: &str,
        history: &[TranscriptEntry],
        metadata: &ChannelMetadata,
    ) -> Result<ScamVerdict, ClassifierError>;
}

/// The classifier's judgement on one message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScamVerdict {
    /// Whether the message looks like a scam attempt.
    pub is_scam: bool,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

impl ScamVerdict {
    /// Creates a verdict, clamping confidence into [0, 1].
    pub fn new(is_scam: bool, confidence: f64) -> Self {
        Self {
            is_scam,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// The conservative default: not a scam, zero confidence.
    /// Used whenever the classifier fails or returns garbage.
    pub fn clean() -> Self {
        Self {
            is_scam: false,
            confidence: 0.0,
        }
    }

    /// Returns true if this verdict clears the given detection threshold.
    pub fn clears(&self, threshold: f64) -> bool {
        self.is_scam && self.confidence > threshold
    }
}

/// Classifier errors.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The classification service could not be reached.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// The service responded but the response was unusable.
    #[error("classifier response unusable: {0}")]
    Malformed(String),

    /// The request exceeded the configured timeout.
    #[error("classifier timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

//! Engagement policy configuration
//!
//! The defaults are fixed behavioral constants; overriding them changes
//! when sessions engage and conclude, so do it deliberately.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::session::{
    ConclusionPolicy, DEFAULT_DETECTION_THRESHOLD, DEFAULT_MAX_TOTAL_MESSAGES,
    DEFAULT_MIN_ENGAGEMENT_MESSAGES,
};

/// Engagement policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngagementConfig {
    /// Classifier confidence required to start engagement
    #[serde(default = "default_detection_threshold")]
    pub detection_threshold: f64,

    /// Post-engagement messages required before any conclusion
    #[serde(default = "default_min_engagement_messages")]
    pub min_engagement_messages: usize,

    /// Total messages forcing a conclusion
    #[serde(default = "default_max_total_messages")]
    pub max_total_messages: usize,
}

impl EngagementConfig {
    /// Builds the domain policy from this configuration
    pub fn policy(&self) -> ConclusionPolicy {
        ConclusionPolicy {
            min_engagement_messages: self.min_engagement_messages,
            max_total_messages: self.max_total_messages,
        }
    }

    /// Validate engagement configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.detection_threshold) {
            return Err(ValidationError::InvalidDetectionThreshold);
        }
        if self.min_engagement_messages > self.max_total_messages {
            return Err(ValidationError::InvalidEngagementWindow);
        }
        Ok(())
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            detection_threshold: default_detection_threshold(),
            min_engagement_messages: default_min_engagement_messages(),
            max_total_messages: default_max_total_messages(),
        }
    }
}

fn default_detection_threshold() -> f64 {
    DEFAULT_DETECTION_THRESHOLD
}

fn default_min_engagement_messages() -> usize {
    DEFAULT_MIN_ENGAGEMENT_MESSAGES
}

fn default_max_total_messages() -> usize {
    DEFAULT_MAX_TOTAL_MESSAGES
}

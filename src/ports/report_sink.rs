//! Report Sink Port - Interface for final report delivery.
//!
//! Once a session concludes, its accumulated intelligence is handed to an
//! external sink exactly once. Delivery is best-effort: a failure is
//! logged and the session keeps `callback_sent = false` permanently; the
//! intelligence itself stays safe in the session state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;
use crate::domain::intelligence::IntelligenceBundle;

/// The final summary of a concluded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementReport {
    /// The session this report describes.
    pub session_id: SessionId,
    /// Whether a scam was confirmed.
    pub scam_detected: bool,
    /// Total messages in the conversation log.
    pub total_messages: usize,
    /// Everything extracted over the engagement.
    pub intelligence: IntelligenceBundle,
    /// Human-readable summary of the engagement.
    pub summary: String,
}

/// Port for report delivery.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Delivers the report. One attempt; retries are the sink's own
    /// business if it wants them.
    async fn deliver(&self, report: &EngagementReport) -> Result<(), ReportSinkError>;
}

/// Report delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportSinkError {
    /// The sink endpoint could not be reached.
    #[error("report sink unreachable: {0}")]
    Unreachable(String),

    /// The sink rejected the report.
    #[error("report sink rejected delivery: status {status}")]
    Rejected { status: u16 },

    /// The request exceeded the configured timeout.
    #[error("report delivery timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_with_intelligence() {
        let report = EngagementReport {
            session_id: SessionId::new("s-1").unwrap(),
            scam_detected: true,
            total_messages: 12,
            intelligence: IntelligenceBundle::new(),
            summary: "test".to_string(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["session_id"], "s-1");
        assert_eq!(json["total_messages"], 12);
    }
}

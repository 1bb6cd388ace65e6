//! Final report assembly for concluded sessions.

use crate::domain::session::Session;
use crate::ports::EngagementReport;

/// Builds the final report from a session snapshot.
///
/// Called at the moment of conclusion, so the report is pinned to the
/// session state as it was when the policy fired.
pub fn build_report(session: &Session) -> EngagementReport {
    let intel = session.intelligence();
    let summary = format!(
        "Session concluded after {} messages. Scam confidence: {:.2}. \
         Intelligence extracted: {} payment handles, {} phone numbers, {} links.",
        session.total_messages(),
        session.scam_confidence(),
        intel.payment_handles.len(),
        intel.phone_numbers.len(),
        intel.links.len(),
    );

    EngagementReport {
        session_id: session.id().clone(),
        scam_detected: session.scam_detected(),
        total_messages: session.total_messages(),
        intelligence: intel.clone(),
        summary,
    }
}

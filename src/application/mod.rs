//! Application layer: orchestration over the domain and ports.

mod orchestrator;
mod report;

pub use orchestrator::{EngagementOrchestrator, InboundMessage, TurnOutcome};
pub use report::build_report;

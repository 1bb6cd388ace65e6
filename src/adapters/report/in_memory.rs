//! In-memory report sink for testing and local development.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{EngagementReport, ReportSink, ReportSinkError};

/// Report sink that records deliveries in memory.
///
/// Can be switched to fail so tests can exercise the no-retry path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportSink {
    delivered: Arc<Mutex<Vec<EngagementReport>>>,
    fail: Arc<Mutex<bool>>,
}

impl InMemoryReportSink {
    /// Creates a sink that accepts every delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that rejects every delivery.
    pub fn failing() -> Self {
        let sink = Self::default();
        *sink.fail.lock().unwrap() = true;
        sink
    }

    /// Switches failure mode on or off.
    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock().unwrap() = failing;
    }

    /// Returns all reports delivered so far.
    pub fn delivered(&self) -> Vec<EngagementReport> {
        self.delivered.lock().unwrap().clone()
    }

    /// Returns the number of successful deliveries.
    pub fn delivery_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportSink for InMemoryReportSink {
    async fn deliver(&self, report: &EngagementReport) -> Result<(), ReportSinkError> {
        if *self.fail.lock().unwrap() {
            return Err(ReportSinkError::Unreachable("sink set to fail".to_string()));
        }
        self.delivered.lock().unwrap().push(report.clone());
        Ok(())
    }
}

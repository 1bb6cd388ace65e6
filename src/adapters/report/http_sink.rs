//! HTTP Report Sink Adapter
//!
//! Delivers the final report of a concluded session to the configured
//! callback endpoint as a JSON POST. One attempt, no retries; a failed
//! delivery is the caller's to log.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::ports::{EngagementReport, ReportSink, ReportSinkError};

/// Configuration for the HTTP report sink.
#[derive(Debug, Clone)]
pub struct HttpReportSinkConfig {
    /// Callback endpoint URL.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpReportSinkConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Report sink POSTing to a callback endpoint.
#[derive(Debug, Clone)]
pub struct HttpReportSink {
    config: HttpReportSinkConfig,
    client: Client,
}

impl HttpReportSink {
    /// Creates a new sink with the given configuration.
    pub fn new(config: HttpReportSinkConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn deliver(&self, report: &EngagementReport) -> Result<(), ReportSinkError> {
        let payload = CallbackPayload::from(report);

        let response = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReportSinkError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    ReportSinkError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ReportSinkError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Wire payload for the callback endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallbackPayload {
    session_id: String,
    scam_detected: bool,
    total_messages_exchanged: usize,
    extracted_intelligence: CallbackIntelligence,
    agent_notes: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallbackIntelligence {
    payment_handles: Vec<String>,
    phone_numbers: Vec<String>,
    bank_accounts: Vec<String>,
    phishing_links: Vec<String>,
    suspicious_keywords: Vec<String>,
}

impl From<&EngagementReport> for CallbackPayload {
    fn from(report: &EngagementReport) -> Self {
        let intel = &report.intelligence;
        Self {
            session_id: report.session_id.to_string(),
            scam_detected: report.scam_detected,
            total_messages_exchanged: report.total_messages,
            extracted_intelligence: CallbackIntelligence {
                payment_handles: intel.payment_handles.iter().cloned().collect(),
                phone_numbers: intel.phone_numbers.iter().cloned().collect(),
                bank_accounts: intel.bank_accounts.iter().cloned().collect(),
                phishing_links: intel.links.iter().cloned().collect(),
                suspicious_keywords: intel.keywords.iter().cloned().collect(),
            },
            agent_notes: report.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::intelligence::IntelligenceBundle;

    fn sample_report() -> EngagementReport {
        let mut intelligence = IntelligenceBundle::new();
        intelligence.payment_handles.insert("x@paytm".to_string());
        intelligence.phone_numbers.insert("9876543210".to_string());

        EngagementReport {
            session_id: SessionId::new("session-1").unwrap(),
            scam_detected: true,
            total_messages: 12,
            intelligence,
            summary: "Session concluded after 12 messages.".to_string(),
        }
    }

    #[test]
    fn payload_uses_camel_case_wire_names() {
        let payload = CallbackPayload::from(&sample_report());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["sessionId"], "session-1");
        assert_eq!(json["scamDetected"], true);
        assert_eq!(json["totalMessagesExchanged"], 12);
        assert_eq!(json["extractedIntelligence"]["paymentHandles"][0], "x@paytm");
        assert_eq!(json["extractedIntelligence"]["phoneNumbers"][0], "9876543210");
        assert!(json["agentNotes"].as_str().unwrap().contains("12 messages"));
    }

    #[test]
    fn payload_empty_sets_serialize_as_empty_arrays() {
        let report = EngagementReport {
            session_id: SessionId::new("s").unwrap(),
            scam_detected: true,
            total_messages: 0,
            intelligence: IntelligenceBundle::new(),
            summary: String::new(),
        };
        let json = serde_json::to_value(CallbackPayload::from(&report)).unwrap();
        assert_eq!(json["extractedIntelligence"]["bankAccounts"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_reported() {
        let sink = HttpReportSink::new(
            HttpReportSinkConfig::new("http://127.0.0.1:1/callback")
                .with_timeout(Duration::from_millis(200)),
        );

        let err = sink.deliver(&sample_report()).await.unwrap_err();
        assert!(matches!(
            err,
            ReportSinkError::Unreachable(_) | ReportSinkError::Timeout { .. }
        ));
    }
}

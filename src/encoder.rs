//! Report encoding
//!
//! Wraps engine views (dashboard summaries, charts) in a report envelope with
//! producer metadata and a computation timestamp, and renders them to JSON for
//! presentation surfaces.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::TrackerError;
use crate::types::{Report, ReportProducer};
use crate::{PRODUCER_NAME, TRACKER_VERSION};

/// Encoder for producing report payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a view in a report envelope
    pub fn encode<T: Serialize>(&self, data: T) -> Report<T> {
        Report {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: TRACKER_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            data,
        }
    }

    /// Wrap a view and render it as compact JSON
    pub fn encode_to_json<T: Serialize>(&self, data: T) -> Result<String, TrackerError> {
        let report = self.encode(data);
        serde_json::to_string(&report).map_err(|e| TrackerError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::dashboard;
    use crate::config::DashboardConfig;
    use crate::store::EntryStore;

    #[test]
    fn test_encode_report_envelope() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(vec![1, 2, 3]);

        assert_eq!(report.producer.name, "symptom-flux");
        assert_eq!(report.producer.version, TRACKER_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.data, vec![1, 2, 3]);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.computed_at_utc).is_ok());
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = ReportEncoder::new();
        let summary = dashboard(&EntryStore::new(), &DashboardConfig::default());
        let json = encoder.encode_to_json(&summary).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["producer"]["name"], "symptom-flux");
        assert_eq!(value["producer"]["instanceId"], encoder.instance_id());
        assert_eq!(value["data"]["totalEntries"], 0);
        assert_eq!(value["data"]["averages"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(
            ReportEncoder::new().instance_id(),
            ReportEncoder::new().instance_id()
        );
    }
}

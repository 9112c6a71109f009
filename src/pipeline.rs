//! Session orchestration
//!
//! This module provides the public API for Symptom Flux. A [`TrackerSession`]
//! owns the entry store for one session and wires the stages together:
//! raw fields → normalizer → store → aggregation / series → report encoding.

use chrono::NaiveDate;

use crate::aggregate::{self, average_of};
use crate::config::TrackerConfig;
use crate::encoder::ReportEncoder;
use crate::error::TrackerError;
use crate::normalizer::{parse_ndjson, EntryNormalizer, RawEntry};
use crate::series;
use crate::store::EntryStore;
use crate::types::{DashboardSummary, SymptomChart, SymptomEntry, SymptomKey};

/// Build a dashboard report from newline-delimited raw entries (stateless, one-shot).
///
/// # Arguments
/// * `ndjson` - One raw entry JSON object per line
/// * `capture_date` - Date used for records that carry none
///
/// # Example
/// ```ignore
/// let report = entries_to_dashboard(ndjson, today)?;
/// ```
pub fn entries_to_dashboard(ndjson: &str, capture_date: NaiveDate) -> Result<String, TrackerError> {
    let mut session = TrackerSession::new();
    session.log_all(parse_ndjson(ndjson)?, capture_date);
    session.dashboard_json()
}

/// Stateful session holding the entry store and configuration.
///
/// The store is owned here and lent read-only to aggregation and series
/// building; entries are only ever appended.
pub struct TrackerSession {
    store: EntryStore,
    config: TrackerConfig,
    encoder: ReportEncoder,
}

impl Default for TrackerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerSession {
    /// Create a session with default settings
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create a session with explicit configuration
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            store: EntryStore::new(),
            config,
            encoder: ReportEncoder::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Read-only view of the store
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[SymptomEntry] {
        self.store.all()
    }

    /// Normalize raw fields and append the resulting entry
    pub fn log_entry(&mut self, raw: RawEntry, capture_date: NaiveDate) -> &SymptomEntry {
        let entry = EntryNormalizer::normalize(raw, capture_date);
        self.store.append(entry)
    }

    /// Normalize and append a raw entry given as JSON
    pub fn log_entry_json(
        &mut self,
        json: &str,
        capture_date: NaiveDate,
    ) -> Result<&SymptomEntry, TrackerError> {
        let raw = RawEntry::from_json(json)?;
        Ok(self.log_entry(raw, capture_date))
    }

    /// Log many raw entries in order, returning how many were appended
    pub fn log_all(
        &mut self,
        raws: impl IntoIterator<Item = RawEntry>,
        capture_date: NaiveDate,
    ) -> usize {
        let before = self.store.len();
        for raw in raws {
            self.log_entry(raw, capture_date);
        }
        self.store.len() - before
    }

    /// Average of one symptom over the whole store
    pub fn average_of(&self, key: SymptomKey) -> f64 {
        average_of(&self.store, key)
    }

    pub fn dashboard(&self) -> DashboardSummary {
        aggregate::dashboard(&self.store, &self.config.dashboard)
    }

    /// Single-symptom chart over the configured wide window
    pub fn symptom_chart(&self, key: SymptomKey) -> SymptomChart {
        series::symptom_chart(&self.store, key, &self.config.series)
    }

    /// All-symptom chart over the configured overview window
    pub fn overview_chart(&self) -> SymptomChart {
        series::overview_chart(&self.store, &self.config.series)
    }

    pub fn dashboard_json(&self) -> Result<String, TrackerError> {
        self.encoder.encode_to_json(self.dashboard())
    }

    pub fn symptom_chart_json(&self, key: SymptomKey) -> Result<String, TrackerError> {
        self.encoder.encode_to_json(self.symptom_chart(key))
    }

    pub fn overview_chart_json(&self) -> Result<String, TrackerError> {
        self.encoder.encode_to_json(self.overview_chart())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeriesConfig;
    use crate::types::CyclePhase;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn sample_ndjson() -> &'static str {
        r#"{"date": "2024-06-01", "symptoms": {"stress": 2, "bloating": 5}, "cycleDay": "Day 3"}
{"date": "2024-06-02", "symptoms": {"stress": 4, "bloating": 6}, "cycleDay": "Day 10", "notes": "long day"}
{"date": "2024-06-03", "symptoms": {"stress": 9, "bloating": 1}, "cycleDay": "Break Day 1", "photo": "data:image/png;base64,AAAA"}
"#
    }

    #[test]
    fn test_entries_to_dashboard() {
        let json = entries_to_dashboard(sample_ndjson(), today()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let data = &value["data"];
        assert_eq!(data["totalEntries"], 3);
        assert_eq!(data["headline"][0]["symptom"], "stress");
        assert_eq!(data["headline"][0]["average"], 5.0);
        assert_eq!(data["headline"][1]["symptom"], "bloating");
        assert_eq!(data["headline"][1]["average"], 4.0);
        assert_eq!(data["recent"][2]["entry"]["cyclePhase"], "Menstrual");
        assert_eq!(data["recent"][2]["entry"]["photo"], "data:image/png;base64,AAAA");
        assert!(data["recent"][0]["entry"].get("photo").is_none());
    }

    #[test]
    fn test_empty_input_is_empty_dashboard() {
        let json = entries_to_dashboard("", today()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"]["totalEntries"], 0);
        assert_eq!(value["data"]["averages"][0]["average"], 0.0);
        assert!(value["data"]["recent"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_ndjson() {
        let result = entries_to_dashboard("not valid json", today());
        assert!(matches!(result, Err(TrackerError::ParseError(_))));
    }

    #[test]
    fn test_session_log_and_views() {
        let mut session = TrackerSession::new();
        let entry = session
            .log_entry_json(r#"{"symptoms": {"acne": 3}, "cycleDay": "Day 15"}"#, today())
            .unwrap();
        assert_eq!(entry.date(), today());
        assert_eq!(entry.cycle_phase(), CyclePhase::Luteal);

        session.log_entry(RawEntry::default(), today());

        assert_eq!(session.entries().len(), 2);
        assert_eq!(session.average_of(SymptomKey::Acne), 1.5);
        assert_eq!(session.symptom_chart(SymptomKey::Acne).values(SymptomKey::Acne), vec![3, 0]);
        assert_eq!(session.overview_chart().len(), 2);
    }

    #[test]
    fn test_session_respects_config() {
        let mut config = TrackerConfig::default();
        config.series = SeriesConfig {
            symptom_window: 2,
            overview_window: 1,
        };
        config.dashboard.recent_window = 1;

        let mut session = TrackerSession::with_config(config);
        let raws = parse_ndjson(sample_ndjson()).unwrap();
        assert_eq!(session.log_all(raws, today()), 3);

        assert_eq!(session.symptom_chart(SymptomKey::Stress).values(SymptomKey::Stress), vec![4, 9]);
        assert_eq!(session.overview_chart().len(), 1);
        assert_eq!(session.dashboard().recent.len(), 1);
    }

    #[test]
    fn test_chart_json() {
        let mut session = TrackerSession::new();
        session.log_all(parse_ndjson(sample_ndjson()).unwrap(), today());

        let json = session.symptom_chart_json(SymptomKey::Bloating).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"]["windowSize"], 30);
        assert_eq!(value["data"]["symptoms"][0], "bloating");
        assert_eq!(value["data"]["points"][1]["displayLabel"], "Jun 2 (Ovulation)");

        let json = session.overview_chart_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"]["windowSize"], 14);
        assert_eq!(value["data"]["points"].as_array().unwrap().len(), 3);
    }
}

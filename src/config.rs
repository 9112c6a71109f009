//! Engine configuration
//!
//! Window sizes and dashboard options, loadable from TOML. Every field has a
//! default so a partial (or empty) file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TrackerError;
use crate::types::SymptomKey;

/// Default number of most-recent entries in a single-symptom chart
pub const DEFAULT_SYMPTOM_WINDOW: usize = 30;

/// Default number of most-recent entries in the all-symptom overview
pub const DEFAULT_OVERVIEW_WINDOW: usize = 14;

/// Default number of recent entries listed on the dashboard
pub const DEFAULT_RECENT_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub symptom_window: usize,
    pub overview_window: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            symptom_window: DEFAULT_SYMPTOM_WINDOW,
            overview_window: DEFAULT_OVERVIEW_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub recent_window: usize,
    /// Symptoms whose averages are called out at the top of the dashboard
    pub headline_symptoms: Vec<SymptomKey>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_window: DEFAULT_RECENT_WINDOW,
            headline_symptoms: vec![SymptomKey::Stress, SymptomKey::Bloating],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub log_level: String,
    pub series: SeriesConfig,
    pub dashboard: DashboardConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            series: SeriesConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, TrackerError> {
        toml::from_str(toml).map_err(|e| TrackerError::ConfigError(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TrackerError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize configuration to TOML
    pub fn to_toml_string(&self) -> Result<String, TrackerError> {
        toml::to_string(self).map_err(|e| TrackerError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.series.symptom_window, 30);
        assert_eq!(config.series.overview_window, 14);
        assert_eq!(config.dashboard.recent_window, 7);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TrackerConfig::from_toml_str(
            r#"
            [series]
            overview_window = 21

            [dashboard]
            headline_symptoms = ["fatigue", "moonFace"]
            "#,
        )
        .unwrap();

        assert_eq!(config.series.overview_window, 21);
        assert_eq!(config.series.symptom_window, 30);
        assert_eq!(config.dashboard.recent_window, 7);
        assert_eq!(
            config.dashboard.headline_symptoms,
            vec![SymptomKey::Fatigue, SymptomKey::MoonFace]
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            TrackerConfig::from_toml_str("").unwrap(),
            TrackerConfig::default()
        );
    }

    #[test]
    fn test_invalid_toml() {
        let result = TrackerConfig::from_toml_str("[series]\nsymptom_window = \"many\"");
        assert!(matches!(result, Err(TrackerError::ConfigError(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TrackerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(TrackerConfig::from_toml_str(&text).unwrap(), config);
    }
}

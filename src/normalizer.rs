//! Entry normalization
//!
//! This module turns raw captured fields into canonical [`SymptomEntry`] values.
//! - Severities rounded and clamped to 0-10, absent symptoms default to 0
//! - Cycle phase always derived from the cycle-day label
//! - Photo omitted when absent, kept verbatim when present

use chrono::NaiveDate;
use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::error::TrackerError;
use crate::types::{PhotoRef, SymptomEntry, SymptomKey, SymptomSeverities, MAX_SEVERITY};

/// Raw severities as captured. Any JSON value is accepted per symptom; numbers
/// and numeric strings are used, anything else counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeverities {
    #[serde(default)]
    pub acne: Option<Value>,
    #[serde(default, alias = "moon_face")]
    pub moon_face: Option<Value>,
    #[serde(default)]
    pub bloating: Option<Value>,
    #[serde(default)]
    pub stress: Option<Value>,
    #[serde(default)]
    pub eczema: Option<Value>,
    #[serde(default)]
    pub fatigue: Option<Value>,
}

impl RawSeverities {
    fn get(&self, key: SymptomKey) -> Option<&Value> {
        match key {
            SymptomKey::Acne => self.acne.as_ref(),
            SymptomKey::MoonFace => self.moon_face.as_ref(),
            SymptomKey::Bloating => self.bloating.as_ref(),
            SymptomKey::Stress => self.stress.as_ref(),
            SymptomKey::Eczema => self.eczema.as_ref(),
            SymptomKey::Fatigue => self.fatigue.as_ref(),
        }
    }

    /// Set a single symptom from a number
    pub fn set(&mut self, key: SymptomKey, value: f64) {
        let value = serde_json::Number::from_f64(value).map(Value::Number);
        match key {
            SymptomKey::Acne => self.acne = value,
            SymptomKey::MoonFace => self.moon_face = value,
            SymptomKey::Bloating => self.bloating = value,
            SymptomKey::Stress => self.stress = value,
            SymptomKey::Eczema => self.eczema = value,
            SymptomKey::Fatigue => self.fatigue = value,
        }
    }
}

/// Fields captured for one day, before normalization.
///
/// Any `cyclePhase` supplied alongside these fields is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    /// Day the entry is for; falls back to the capture date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "severities")]
    pub symptoms: RawSeverities,
    #[serde(default, alias = "emotional_event")]
    pub emotional_event: String,
    #[serde(default, alias = "cycle_day")]
    pub cycle_day: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl RawEntry {
    /// Parse a single raw entry from JSON
    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        Ok(decode_record(serde_json::from_str(json)?)?)
    }
}

/// Decode one record. Only JSON objects are records: the derived decoder would
/// also fill a struct from an array by position, turning `[]` into a blank day.
fn decode_record(value: Value) -> Result<RawEntry, serde_json::Error> {
    if value.is_object() {
        return serde_json::from_value(value);
    }
    let unexpected = match &value {
        Value::Object(_) => Unexpected::Map,
        Value::Array(_) => Unexpected::Seq,
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
    };
    Err(serde_json::Error::invalid_type(unexpected, &"a JSON object"))
}

/// Normalizer for converting raw captured fields into canonical entries
pub struct EntryNormalizer;

impl EntryNormalizer {
    /// Build a canonical entry. Pure: appending it to a store is up to the caller.
    pub fn normalize(raw: RawEntry, capture_date: NaiveDate) -> SymptomEntry {
        let severities = normalize_severities(&raw.symptoms);

        SymptomEntry::new(
            raw.date.unwrap_or(capture_date),
            severities,
            raw.emotional_event,
            raw.cycle_day,
            raw.notes,
            raw.photo.map(PhotoRef::new),
        )
    }
}

fn normalize_severities(raw: &RawSeverities) -> SymptomSeverities {
    SymptomKey::ALL
        .into_iter()
        .fold(SymptomSeverities::default(), |acc, key| {
            acc.with(key, clamp_severity(key, raw.get(key)))
        })
}

/// Round a raw value to the nearest integer and clamp it into 0-10.
/// Absent or non-numeric values become 0.
fn clamp_severity(key: SymptomKey, value: Option<&Value>) -> i64 {
    let number = match value {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    let Some(number) = number.filter(|n| n.is_finite()) else {
        warn!(symptom = %key, raw = ?value, "non-numeric severity, defaulting to 0");
        return 0;
    };

    let rounded = number.round();
    if rounded < 0.0 || rounded > MAX_SEVERITY as f64 {
        warn!(symptom = %key, raw = number, "severity out of range, clamping");
    }

    rounded.clamp(0.0, MAX_SEVERITY as f64) as i64
}

/// Parse newline-delimited JSON raw entries, skipping blank lines
pub fn parse_ndjson(input: &str) -> Result<Vec<RawEntry>, TrackerError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line.trim())
                .and_then(decode_record)
                .map_err(|e| TrackerError::ParseError(format!("line {}: {}", index + 1, e)))
        })
        .collect()
}

/// Parse a JSON array of raw entries
pub fn parse_array(input: &str) -> Result<Vec<RawEntry>, TrackerError> {
    let values: Vec<Value> = serde_json::from_str(input)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            decode_record(value)
                .map_err(|e| TrackerError::ParseError(format!("record {}: {}", index, e)))
        })
        .collect()
}

/// Where a failing record sits in its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLocation {
    /// 1-based line of an NDJSON input
    Line(usize),
    /// 0-based position in a JSON array input
    Index(usize),
    /// The input as a whole is not a JSON array
    Document,
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLocation::Line(line) => write!(f, "line {line}"),
            RecordLocation::Index(index) => write!(f, "record {index}"),
            RecordLocation::Document => f.write_str("document"),
        }
    }
}

/// A record that failed to decode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordIssue {
    pub location: RecordLocation,
    pub error: String,
}

/// Check every non-blank line of an NDJSON input, collecting failures instead of
/// stopping at the first one
pub fn validate_ndjson(input: &str) -> (usize, Vec<RecordIssue>) {
    let mut total = 0;
    let mut issues = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        total += 1;

        if let Err(e) = serde_json::from_str(trimmed).and_then(decode_record) {
            issues.push(RecordIssue {
                location: RecordLocation::Line(index + 1),
                error: e.to_string(),
            });
        }
    }

    (total, issues)
}

/// Check every element of a JSON array input. An input that is not an array at
/// all counts as zero records with one document-level issue.
pub fn validate_array(input: &str) -> (usize, Vec<RecordIssue>) {
    let values: Vec<Value> = match serde_json::from_str(input) {
        Ok(values) => values,
        Err(e) => {
            return (
                0,
                vec![RecordIssue {
                    location: RecordLocation::Document,
                    error: e.to_string(),
                }],
            )
        }
    };

    let total = values.len();
    let issues = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            decode_record(value).err().map(|e| RecordIssue {
                location: RecordLocation::Index(index),
                error: e.to_string(),
            })
        })
        .collect();

    (total, issues)
}

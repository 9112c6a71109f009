//! Core types for the Symptom Flux engine
//!
//! This module defines the data structures that flow through each stage of the
//! engine: symptom severities, cycle phases, canonical entries, chart points and
//! the report payloads handed to presentation surfaces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cycle::resolve_phase;
use crate::error::TrackerError;

/// Upper bound of every severity scale (inclusive)
pub const MAX_SEVERITY: u8 = 10;

/// The six tracked symptoms, in canonical display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymptomKey {
    Acne,
    MoonFace,
    Bloating,
    Stress,
    Eczema,
    Fatigue,
}

impl SymptomKey {
    /// All symptoms in canonical order
    pub const ALL: [SymptomKey; 6] = [
        SymptomKey::Acne,
        SymptomKey::MoonFace,
        SymptomKey::Bloating,
        SymptomKey::Stress,
        SymptomKey::Eczema,
        SymptomKey::Fatigue,
    ];

    /// Wire name, as used in entry records and chart points
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomKey::Acne => "acne",
            SymptomKey::MoonFace => "moonFace",
            SymptomKey::Bloating => "bloating",
            SymptomKey::Stress => "stress",
            SymptomKey::Eczema => "eczema",
            SymptomKey::Fatigue => "fatigue",
        }
    }

    /// Human-readable label for legends and tooltips
    pub fn label(&self) -> &'static str {
        match self {
            SymptomKey::Acne => "Acne",
            SymptomKey::MoonFace => "Moon Face",
            SymptomKey::Bloating => "Bloating",
            SymptomKey::Stress => "Stress",
            SymptomKey::Eczema => "Eczema",
            SymptomKey::Fatigue => "Fatigue",
        }
    }
}

impl fmt::Display for SymptomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymptomKey {
    type Err = TrackerError;

    /// Accepts the wire name (`moonFace`), snake_case (`moon_face`) or the label
    /// (`Moon Face`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        SymptomKey::ALL
            .into_iter()
            .find(|key| key.as_str().to_lowercase() == folded)
            .ok_or_else(|| TrackerError::UnknownSymptom(s.to_string()))
    }
}

/// Severities for all six symptoms, each within `0..=MAX_SEVERITY`.
///
/// Fields are private so the range invariant cannot be bypassed; values come in
/// through [`SymptomSeverities::with`] (clamping) or through the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomSeverities {
    acne: u8,
    moon_face: u8,
    bloating: u8,
    stress: u8,
    eczema: u8,
    fatigue: u8,
}

impl SymptomSeverities {
    /// Severity recorded for one symptom
    pub fn get(&self, key: SymptomKey) -> u8 {
        match key {
            SymptomKey::Acne => self.acne,
            SymptomKey::MoonFace => self.moon_face,
            SymptomKey::Bloating => self.bloating,
            SymptomKey::Stress => self.stress,
            SymptomKey::Eczema => self.eczema,
            SymptomKey::Fatigue => self.fatigue,
        }
    }

    /// Return a copy with one symptom set, clamped into range
    pub fn with(mut self, key: SymptomKey, value: i64) -> Self {
        let value = value.clamp(0, MAX_SEVERITY as i64) as u8;
        let slot = match key {
            SymptomKey::Acne => &mut self.acne,
            SymptomKey::MoonFace => &mut self.moon_face,
            SymptomKey::Bloating => &mut self.bloating,
            SymptomKey::Stress => &mut self.stress,
            SymptomKey::Eczema => &mut self.eczema,
            SymptomKey::Fatigue => &mut self.fatigue,
        };
        *slot = value;
        self
    }

    /// Iterate `(symptom, severity)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (SymptomKey, u8)> + '_ {
        SymptomKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

/// Cycle phase derived from a cycle-day label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CyclePhase {
    Follicular,
    Ovulation,
    Luteal,
    Menstrual,
    /// No label recorded, or a label outside the known vocabulary
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl CyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Follicular => "Follicular",
            CyclePhase::Ovulation => "Ovulation",
            CyclePhase::Luteal => "Luteal",
            CyclePhase::Menstrual => "Menstrual",
            CyclePhase::Unknown => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CyclePhase::Unknown)
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque encoded-image payload (e.g. a data URL) supplied by a capture surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A cleared photo keeps its slot but carries no payload
    pub fn is_cleared(&self) -> bool {
        self.0.is_empty()
    }
}

/// One day's canonical symptom and cycle record.
///
/// Entries are immutable. The phase is computed from the cycle-day label when the
/// entry is built and cannot be set independently of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntry {
    date: NaiveDate,
    #[serde(rename = "symptoms")]
    severities: SymptomSeverities,
    emotional_event: String,
    cycle_day: String,
    cycle_phase: CyclePhase,
    notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<PhotoRef>,
}

impl SymptomEntry {
    pub(crate) fn new(
        date: NaiveDate,
        severities: SymptomSeverities,
        emotional_event: String,
        cycle_day: String,
        notes: String,
        photo: Option<PhotoRef>,
    ) -> Self {
        let cycle_phase = resolve_phase(&cycle_day);
        Self {
            date,
            severities,
            emotional_event,
            cycle_day,
            cycle_phase,
            notes,
            photo,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn severities(&self) -> &SymptomSeverities {
        &self.severities
    }

    pub fn severity(&self, key: SymptomKey) -> u8 {
        self.severities.get(key)
    }

    pub fn emotional_event(&self) -> &str {
        &self.emotional_event
    }

    pub fn cycle_day(&self) -> &str {
        &self.cycle_day
    }

    pub fn cycle_phase(&self) -> CyclePhase {
        self.cycle_phase
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn photo(&self) -> Option<&PhotoRef> {
        self.photo.as_ref()
    }
}

/// Display bucket for a severity value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityBand {
    None,
    Mild,
    Moderate,
    Severe,
}

impl SeverityBand {
    /// Classify a severity: 0 none, 1-3 mild, 4-6 moderate, 7 and above severe
    pub fn classify(value: u8) -> Self {
        match value {
            0 => SeverityBand::None,
            1..=3 => SeverityBand::Mild,
            4..=6 => SeverityBand::Moderate,
            _ => SeverityBand::Severe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::None => "None",
            SeverityBand::Mild => "Mild",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::Severe => "Severe",
        }
    }
}

/// A single symptom value attached to a chart point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymptomReading {
    pub symptom: SymptomKey,
    pub value: u8,
    pub band: SeverityBand,
}

/// One plotted day, shared by every symptom line of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Short axis label ("Jan 15")
    pub date: String,
    /// Calendar day the entry was logged for
    pub full_date: NaiveDate,
    /// Axis label with the phase appended when known ("Jan 15 (Luteal)")
    pub display_label: String,
    pub cycle_day: String,
    pub cycle_phase: CyclePhase,
    /// All six severities, flattened so each symptom is its own series key
    #[serde(flatten)]
    pub severities: SymptomSeverities,
    /// Values for the symptoms of interest, in request order
    pub readings: Vec<SymptomReading>,
}

/// A windowed chart over one or more symptoms
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomChart {
    pub symptoms: Vec<SymptomKey>,
    pub window_size: usize,
    pub points: Vec<ChartPoint>,
}

impl SymptomChart {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Series of values for one symptom, point by point
    pub fn values(&self, key: SymptomKey) -> Vec<u8> {
        self.points.iter().map(|p| p.severities.get(key)).collect()
    }
}

/// Running average for one symptom across the whole store
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAverage {
    pub symptom: SymptomKey,
    pub average: f64,
    pub band: SeverityBand,
}

/// A recent entry with its per-symptom display bands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub entry: SymptomEntry,
    pub bands: Vec<(SymptomKey, SeverityBand)>,
}

/// Summary backing the dashboard view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_entries: usize,
    pub averages: Vec<SymptomAverage>,
    pub headline: Vec<SymptomAverage>,
    pub recent: Vec<RecentEntry>,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Envelope for any view handed to a presentation surface
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<T> {
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub data: T,
}

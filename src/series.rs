//! Series building
//!
//! Turns a window of entries into chart points. One point per entry, in window
//! order; every point carries all six severities so any symptom's line can be
//! drawn from the same point set.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::SeriesConfig;
use crate::store::EntryStore;
use crate::types::{
    ChartPoint, SeverityBand, SymptomChart, SymptomEntry, SymptomKey, SymptomReading,
};

/// Build chart points for a window of entries.
///
/// Points keep the window's order; they are not re-sorted by date. `keys`
/// selects the readings attached to each point (duplicates dropped, request
/// order kept).
pub fn build_series(window: &[SymptomEntry], keys: &[SymptomKey]) -> Vec<ChartPoint> {
    let keys = dedup_keys(keys);
    debug!(points = window.len(), symptoms = keys.len(), "building series");

    window.iter().map(|entry| chart_point(entry, &keys)).collect()
}

fn chart_point(entry: &SymptomEntry, keys: &[SymptomKey]) -> ChartPoint {
    let date = short_date_label(entry.date());
    let phase = entry.cycle_phase();
    let display_label = if phase.is_known() {
        format!("{date} ({phase})")
    } else {
        date.clone()
    };

    let readings = keys
        .iter()
        .map(|&symptom| {
            let value = entry.severity(symptom);
            SymptomReading {
                symptom,
                value,
                band: SeverityBand::classify(value),
            }
        })
        .collect();

    ChartPoint {
        date,
        full_date: entry.date(),
        display_label,
        cycle_day: entry.cycle_day().to_string(),
        cycle_phase: phase,
        severities: *entry.severities(),
        readings,
    }
}

/// Axis label such as "Jan 5"
fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

fn dedup_keys(keys: &[SymptomKey]) -> Vec<SymptomKey> {
    let mut unique = Vec::with_capacity(keys.len());
    for &key in keys {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }
    unique
}

/// Chart for a single symptom over the wide trailing window
pub fn symptom_chart(store: &EntryStore, key: SymptomKey, config: &SeriesConfig) -> SymptomChart {
    windowed_chart(store, &[key], config.symptom_window)
}

/// Chart for every symptom over the narrower overview window
pub fn overview_chart(store: &EntryStore, config: &SeriesConfig) -> SymptomChart {
    windowed_chart(store, &SymptomKey::ALL, config.overview_window)
}

/// Chart over the last `window_size` entries for the given symptoms
pub fn windowed_chart(
    store: &EntryStore,
    keys: &[SymptomKey],
    window_size: usize,
) -> SymptomChart {
    let points = build_series(store.trailing_window(window_size), keys);
    SymptomChart {
        symptoms: dedup_keys(keys),
        window_size,
        points,
    }
}

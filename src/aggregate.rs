//! Aggregation
//!
//! Running averages over the whole store and the dashboard summary built on
//! top of them. Averages are taken over every entry, never a window.

use crate::config::DashboardConfig;
use crate::store::EntryStore;
use crate::types::{
    DashboardSummary, RecentEntry, SeverityBand, SymptomAverage, SymptomEntry, SymptomKey,
};

/// Mean severity of one symptom over every entry, rounded half-up to one
/// decimal. An empty store averages to 0; check [`EntryStore::is_empty`] to
/// tell "no data" apart from a true zero.
pub fn average_of(store: &EntryStore, key: SymptomKey) -> f64 {
    let entries = store.all();
    if entries.is_empty() {
        return 0.0;
    }

    let sum: u64 = entries.iter().map(|e| e.severity(key) as u64).sum();
    round_tenths(sum as f64 / entries.len() as f64)
}

/// Averages for all six symptoms in canonical order
pub fn averages(store: &EntryStore) -> Vec<SymptomAverage> {
    SymptomKey::ALL
        .into_iter()
        .map(|key| symptom_average(store, key))
        .collect()
}

fn symptom_average(store: &EntryStore, key: SymptomKey) -> SymptomAverage {
    let average = average_of(store, key);
    SymptomAverage {
        symptom: key,
        average,
        band: SeverityBand::classify(average.round() as u8),
    }
}

/// Half-up rounding at the tenths digit. Means are never negative, so
/// rounding half away from zero is the same thing.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Build the dashboard summary: totals, averages and the most recent entries
pub fn dashboard(store: &EntryStore, config: &DashboardConfig) -> DashboardSummary {
    let headline = config
        .headline_symptoms
        .iter()
        .map(|&key| symptom_average(store, key))
        .collect();

    let recent = store
        .trailing_window(config.recent_window)
        .iter()
        .map(recent_entry)
        .collect();

    DashboardSummary {
        total_entries: store.len(),
        averages: averages(store),
        headline,
        recent,
    }
}

fn recent_entry(entry: &SymptomEntry) -> RecentEntry {
    RecentEntry {
        entry: entry.clone(),
        bands: entry
            .severities()
            .iter()
            .map(|(key, value)| (key, SeverityBand::classify(value)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{EntryNormalizer, RawEntry, RawSeverities};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn entry_with(key: SymptomKey, value: f64) -> SymptomEntry {
        let mut symptoms = RawSeverities::default();
        symptoms.set(key, value);
        EntryNormalizer::normalize(
            RawEntry {
                symptoms,
                ..Default::default()
            },
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
    }

    fn store_with(key: SymptomKey, values: &[f64]) -> EntryStore {
        let mut store = EntryStore::new();
        for &value in values {
            store.append(entry_with(key, value));
        }
        store
    }

    #[test]
    fn test_empty_store_averages_to_zero() {
        let store = EntryStore::new();
        for key in SymptomKey::ALL {
            assert_eq!(average_of(&store, key), 0.0);
        }
    }

    #[test]
    fn test_exact_mean() {
        let store = store_with(SymptomKey::Stress, &[2.0, 4.0, 9.0]);
        assert_eq!(average_of(&store, SymptomKey::Stress), 5.0);
    }

    #[test]
    fn test_rounded_mean() {
        let store = store_with(SymptomKey::Stress, &[1.0, 2.0, 2.0]);
        assert_eq!(average_of(&store, SymptomKey::Stress), 1.7);
    }

    #[test]
    fn test_half_rounds_up() {
        // 5 / 4 = 1.25
        let store = store_with(SymptomKey::Acne, &[1.0, 1.0, 1.0, 2.0]);
        assert_eq!(average_of(&store, SymptomKey::Acne), 1.3);
    }

    #[test]
    fn test_average_covers_whole_store() {
        let mut store = store_with(SymptomKey::Fatigue, &[10.0; 20]);
        for _ in 0..20 {
            store.append(entry_with(SymptomKey::Fatigue, 0.0));
        }
        assert_eq!(average_of(&store, SymptomKey::Fatigue), 5.0);
    }

    #[test]
    fn test_averages_in_canonical_order() {
        let store = store_with(SymptomKey::Eczema, &[3.0, 4.0]);
        let all = averages(&store);

        let keys: Vec<SymptomKey> = all.iter().map(|a| a.symptom).collect();
        assert_eq!(keys, SymptomKey::ALL.to_vec());
        assert_eq!(all[4].average, 3.5);
        assert_eq!(all[4].band, SeverityBand::Moderate);
        assert_eq!(all[0].band, SeverityBand::None);
    }

    #[test]
    fn test_dashboard_summary() {
        let store = store_with(SymptomKey::Stress, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let summary = dashboard(&store, &DashboardConfig::default());

        assert_eq!(summary.total_entries, 9);
        assert_eq!(summary.recent.len(), 7);
        assert_eq!(summary.recent[0].entry.severity(SymptomKey::Stress), 3);
        assert_eq!(summary.recent[6].entry.severity(SymptomKey::Stress), 9);

        let headline: Vec<(SymptomKey, f64)> = summary
            .headline
            .iter()
            .map(|a| (a.symptom, a.average))
            .collect();
        assert_eq!(
            headline,
            vec![(SymptomKey::Stress, 5.0), (SymptomKey::Bloating, 0.0)]
        );

        let last_bands = &summary.recent[6].bands;
        assert_eq!(last_bands.len(), 6);
        assert!(last_bands.contains(&(SymptomKey::Stress, SeverityBand::Severe)));
        assert!(last_bands.contains(&(SymptomKey::Acne, SeverityBand::None)));
    }

    #[test]
    fn test_dashboard_on_empty_store() {
        let summary = dashboard(&EntryStore::new(), &DashboardConfig::default());
        assert_eq!(summary.total_entries, 0);
        assert!(summary.recent.is_empty());
        assert!(summary.averages.iter().all(|a| a.average == 0.0));
    }
}

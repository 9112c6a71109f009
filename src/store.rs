//! Entry store
//!
//! Append-only, insertion-ordered collection of entries. This is the single
//! source every view reads from; aggregation and series building borrow it.

use serde::Serialize;
use tracing::debug;

use crate::types::SymptomEntry;

/// Insertion-ordered entries for one session.
///
/// Order is append order, not calendar order: an earlier date logged after a
/// later one stays after it. Duplicate dates are kept.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EntryStore {
    entries: Vec<SymptomEntry>,
}

impl EntryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the end of the store
    pub fn append(&mut self, entry: SymptomEntry) -> &SymptomEntry {
        debug!(
            date = %entry.date(),
            cycle_day = entry.cycle_day(),
            position = self.entries.len(),
            "appending entry"
        );
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, in insertion order
    pub fn all(&self) -> &[SymptomEntry] {
        &self.entries
    }

    /// The last `n` entries in insertion order, or all of them when the store
    /// holds fewer than `n`
    pub fn trailing_window(&self, n: usize) -> &[SymptomEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{EntryNormalizer, RawEntry};
    use chrono::NaiveDate;

    fn entry_on(day: u32) -> SymptomEntry {
        EntryNormalizer::normalize(
            RawEntry {
                notes: format!("day {day}"),
                ..Default::default()
            },
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        )
    }

    fn store_of(days: &[u32]) -> EntryStore {
        let mut store = EntryStore::new();
        for &day in days {
            store.append(entry_on(day));
        }
        store
    }

    fn days(entries: &[SymptomEntry]) -> Vec<u32> {
        use chrono::Datelike;
        entries.iter().map(|e| e.date().day()).collect()
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let store = store_of(&[5, 2, 9, 2]);

        assert_eq!(store.len(), 4);
        assert_eq!(days(store.all()), vec![5, 2, 9, 2]);
    }

    #[test]
    fn test_append_never_disturbs_prior_entries() {
        let mut store = store_of(&[1, 2, 3]);

        let first = store.all().to_vec();
        let second = store.all().to_vec();
        assert_eq!(first, second);

        store.append(entry_on(4));
        assert_eq!(&store.all()[..3], first.as_slice());
    }

    #[test]
    fn test_trailing_window_smaller_store() {
        let store = store_of(&[3, 1, 2]);

        assert_eq!(days(store.trailing_window(10)), vec![3, 1, 2]);
    }

    #[test]
    fn test_trailing_window_takes_last_n() {
        let store = store_of(&[1, 2, 3, 4, 5, 6]);

        assert_eq!(days(store.trailing_window(4)), vec![3, 4, 5, 6]);
        assert_eq!(days(store.trailing_window(6)), vec![1, 2, 3, 4, 5, 6]);
        assert!(store.trailing_window(0).is_empty());
    }

    #[test]
    fn test_trailing_window_reflects_new_appends() {
        let mut store = store_of(&[1, 2]);
        assert_eq!(days(store.trailing_window(2)), vec![1, 2]);

        store.append(entry_on(3));
        assert_eq!(days(store.trailing_window(2)), vec![2, 3]);
    }

    #[test]
    fn test_empty_store() {
        let store = EntryStore::new();
        assert!(store.is_empty());
        assert!(store.all().is_empty());
        assert!(store.trailing_window(30).is_empty());
    }
}

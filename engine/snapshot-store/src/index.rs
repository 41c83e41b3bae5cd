//! Per-kind index of saved snapshot dates

use chrono::{DateTime, NaiveDate, Utc};
use league_scraper::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which dates have a snapshot for one data kind.
///
/// The caller loads it through a [`crate::SnapshotStore`], records new dates and
/// writes it back. Dates are kept unique and newest-first, and are never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotIndex {
    /// Every division name seen in a recorded snapshot
    pub divisions: BTreeSet<String>,

    /// Snapshot dates, newest first
    pub dates: Vec<NaiveDate>,

    /// When the index was last changed
    pub last_updated: DateTime<Utc>,
}

impl Default for SnapshotIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self { divisions: BTreeSet::new(), dates: Vec::new(), last_updated: Utc::now() }
    }

    /// Record a saved snapshot. Returns `true` if its date was new.
    pub fn record<R>(&mut self, snapshot: &Snapshot<R>) -> bool {
        self.record_date(snapshot.date, snapshot.division_names())
    }

    /// Record a date and the division names it covered
    pub fn record_date(
        &mut self,
        date: NaiveDate,
        divisions: impl IntoIterator<Item = String>,
    ) -> bool {
        self.divisions.extend(divisions);
        self.last_updated = Utc::now();

        // Descending order: newer dates compare as "less"
        match self.dates.binary_search_by(|probe| probe.cmp(&date).reverse()) {
            Ok(_) => false,
            Err(pos) => {
                self.dates.insert(pos, date);
                true
            }
        }
    }

    /// Restore the newest-first, duplicate-free ordering of `dates`
    pub fn normalize(&mut self) {
        self.dates.sort_by(|a, b| b.cmp(a));
        self.dates.dedup();
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Newest recorded date strictly before `date`
    pub fn latest_before(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.dates.iter().find(|d| **d < date).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_dates_stay_unique_and_descending() {
        let mut index = SnapshotIndex::new();

        assert!(index.record_date(day(5), vec!["Gold".to_string()]));
        assert!(index.record_date(day(12), vec!["Gold".to_string()]));
        assert!(index.record_date(day(8), vec!["Silver".to_string()]));
        assert!(!index.record_date(day(12), vec![]));

        assert_eq!(index.dates, vec![day(12), day(8), day(5)]);
        assert_eq!(index.latest(), Some(day(12)));
        assert_eq!(index.latest_before(day(12)), Some(day(8)));
        assert_eq!(index.latest_before(day(5)), None);
        assert_eq!(index.divisions.len(), 2);
    }

    #[test]
    fn test_record_snapshot_merges_divisions() {
        let mut index = SnapshotIndex::new();
        let snapshot: Snapshot<u32> = Snapshot::new(day(3));

        assert!(index.record(&snapshot));
        assert!(index.contains(day(3)));
        assert_eq!(index.divisions.len(), 4);
        assert!(index.divisions.contains("Platinum"));
    }

    #[test]
    fn test_json_shape() {
        let mut index = SnapshotIndex::new();
        index.record_date(day(2), vec!["Gold".to_string()]);
        index.record_date(day(9), vec![]);

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["dates"], serde_json::json!(["2025-01-09", "2025-01-02"]));
        assert_eq!(json["divisions"], serde_json::json!(["Gold"]));
        assert!(json["lastUpdated"].is_string());
    }

    #[test]
    fn test_normalize_repairs_hand_edited_index() {
        let mut index = SnapshotIndex::new();
        index.dates = vec![day(1), day(9), day(4), day(9)];

        index.normalize();

        assert_eq!(index.dates, vec![day(9), day(4), day(1)]);
    }
}

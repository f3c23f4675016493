//! Read-only history snapshot and trend derivation.

use chrono::NaiveDate;

use crate::models::{DailyRecord, Nutrient};

/// A point-in-time snapshot of every daily record for a user.
///
/// Records are held in one canonical ascending-by-date order. Display paths
/// that want newest first iterate in reverse instead of re-sorting, so the
/// two orderings can never diverge.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<DailyRecord>,
}

impl History {
    pub fn new(mut records: Vec<DailyRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Oldest first: the ordering time-series derivations consume.
    pub fn ascending(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.iter()
    }

    /// Newest first: the display ordering. Reversal of [`ascending`](Self::ascending).
    pub fn newest_first(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.iter().rev()
    }

    /// The most recent `n` records, oldest first.
    pub fn last_n_days(&self, n: usize) -> &[DailyRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    /// Per-day values of one nutrient, oldest first.
    pub fn daily_series(&self, nutrient: Nutrient) -> Vec<(NaiveDate, f64)> {
        self.ascending()
            .map(|r| (r.date, r.totals.get(nutrient)))
            .collect()
    }

    /// Mean daily intake of one nutrient over the most recent `days`
    /// records. `None` when there is no history at all.
    pub fn average(&self, nutrient: Nutrient, days: usize) -> Option<f64> {
        let window = self.last_n_days(days);
        if window.is_empty() {
            return None;
        }
        let sum: f64 = window.iter().map(|r| r.totals.get(nutrient)).sum();
        Some(sum / window.len() as f64)
    }
}

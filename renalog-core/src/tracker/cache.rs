//! Read-through cache state.
//!
//! The cache is never an authority and never a write buffer: mutations
//! invalidate it wholesale and the next read re-fetches from the store.

use chrono::NaiveDate;

use crate::history::History;
use crate::models::{DailyRecord, UserProfile};

/// The snapshot held while the cache is fresh.
#[derive(Debug, Clone)]
pub struct CachedData {
    pub profile: UserProfile,
    pub daily: DailyRecord,
    pub history: History,
}

#[derive(Debug, Clone, Default)]
pub enum CacheState {
    /// Nothing fetched yet, or invalidated after a mutation.
    #[default]
    Empty,
    /// Data fetched for `date`; fresh only while today is still `date`.
    Fresh { date: NaiveDate, data: CachedData },
}

impl CacheState {
    /// The snapshot, if it was fetched for `today`. A stale date forces the
    /// caller down the re-fetch path (the day rolled over).
    pub fn fresh_for(&self, today: NaiveDate) -> Option<&CachedData> {
        match self {
            CacheState::Fresh { date, data } if *date == today => Some(data),
            _ => None,
        }
    }

    /// The last snapshot regardless of date. Only the synchronous render
    /// getters use this.
    pub fn cached(&self) -> Option<&CachedData> {
        match self {
            CacheState::Fresh { data, .. } => Some(data),
            CacheState::Empty => None,
        }
    }

    pub fn invalidate(&mut self) {
        *self = CacheState::Empty;
    }
}

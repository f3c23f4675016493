//! Document store contract for per-user nutrition data.
//!
//! The store is the source of truth. It exposes the narrow set of
//! primitives the ledger relies on, most importantly an atomic
//! increment-plus-array mutation: meal additions and removals are expressed
//! as signed deltas applied store-side, never as client-computed running
//! totals, so two in-flight mutations can never lose each other's update.

mod memory;
mod remote;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DailyRecord, MealEntry, NutrientTotals, ProfileUpdate, UserProfile};

/// Errors surfaced by a document store.
///
/// Stores never retry internally; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// One atomic ledger mutation: append or remove a meal entry together with
/// the matching signed nutrient increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum MealMutation {
    Add(MealEntry),
    Remove(MealEntry),
}

impl MealMutation {
    pub fn entry(&self) -> &MealEntry {
        match self {
            MealMutation::Add(entry) | MealMutation::Remove(entry) => entry,
        }
    }

    /// The signed nutrient deltas this mutation applies.
    pub fn deltas(&self) -> NutrientTotals {
        match self {
            MealMutation::Add(entry) => entry.nutrients,
            MealMutation::Remove(entry) => entry.nutrients.negated(),
        }
    }
}

/// The authenticated per-user document tree: `users/{uid}` for profile
/// fields, `users/{uid}/history/{date}` for daily records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one daily record; `Ok(None)` when the date was never logged to.
    async fn read_daily_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, StoreError>;

    /// Full overwrite of a daily record. Used only for first-time creation.
    async fn write_daily_record(
        &self,
        user_id: &str,
        record: &DailyRecord,
    ) -> Result<(), StoreError>;

    /// Applies the mutation's signed increments and meal-list change as one
    /// atomic operation. Concurrent mutations must all be reflected.
    async fn apply_meal_mutation(
        &self,
        user_id: &str,
        date: NaiveDate,
        mutation: &MealMutation,
    ) -> Result<(), StoreError>;

    async fn read_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError>;

    /// Every daily record for the user, in no particular order.
    async fn read_all_daily_records(&self, user_id: &str) -> Result<Vec<DailyRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, MealType};
    use chrono::{TimeZone, Utc};

    fn entry() -> MealEntry {
        let food = FoodItem::new(
            "1",
            "Banana",
            "Fruits",
            "1 medium",
            NutrientTotals {
                sodium: 1.0,
                potassium: 422.0,
                calories: 105.0,
                ..Default::default()
            },
        );
        MealEntry::new(
            food,
            1.0,
            MealType::Snack,
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_remove_deltas_are_negated() {
        let entry = entry();
        let add = MealMutation::Add(entry.clone());
        let remove = MealMutation::Remove(entry);

        assert_eq!(add.deltas().potassium, 422.0);
        assert_eq!(remove.deltas().potassium, -422.0);
    }

    #[test]
    fn test_mutation_wire_format_is_tagged() {
        let json = serde_json::to_value(MealMutation::Add(entry())).unwrap();
        assert_eq!(json["op"], "add");
        assert!(json["id"].is_string());
    }
}

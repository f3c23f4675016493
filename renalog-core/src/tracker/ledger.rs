//! Ledger mutations against the document store.
//!
//! Each logical operation becomes exactly one store mutation: a full write
//! for the first meal of a date, an atomic increment-plus-array mutation
//! otherwise. Nothing here touches the cache; the tracker invalidates it
//! after a mutation reports success.

use chrono::NaiveDate;

use crate::models::{DailyRecord, MealEntry};
use crate::store::{DocumentStore, MealMutation, StoreError};
use crate::timestamp::{date_key, local_date};

/// Logs one meal into the record for the entry's own calendar date.
pub(super) async fn log_meal(
    store: &dyn DocumentStore,
    user_id: &str,
    entry: MealEntry,
) -> Result<(), StoreError> {
    let date = local_date(entry.timestamp);
    match store.read_daily_record(user_id, date).await? {
        None => {
            tracing::debug!(user_id, date = %date_key(date), "creating daily record for first meal");
            let record = DailyRecord::seeded(date, entry);
            store.write_daily_record(user_id, &record).await
        }
        Some(_) => {
            store
                .apply_meal_mutation(user_id, date, &MealMutation::Add(entry))
                .await
        }
    }
}

/// Removes the meal with `meal_id` from the record for `date`.
///
/// A missing record or meal id is an expected race (double-tap delete, a
/// second device already removed it) and reports `Ok(false)` rather than an
/// error. The removal mutation negates exactly the nutrient values the
/// original addition applied; nothing is re-rounded.
pub(super) async fn delete_meal(
    store: &dyn DocumentStore,
    user_id: &str,
    meal_id: &str,
    date: NaiveDate,
) -> Result<bool, StoreError> {
    let Some(record) = store.read_daily_record(user_id, date).await? else {
        tracing::warn!(user_id, date = %date_key(date), "no daily record for deletion date");
        return Ok(false);
    };

    let Some(entry) = record.meals.iter().find(|m| m.id == meal_id) else {
        tracing::warn!(meal_id, date = %date_key(date), "meal entry not found");
        return Ok(false);
    };

    store
        .apply_meal_mutation(user_id, date, &MealMutation::Remove(entry.clone()))
        .await?;
    Ok(true)
}

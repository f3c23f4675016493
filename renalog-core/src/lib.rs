//! Renalog Core Library
//!
//! The nutrient ledger and limit engine beneath the Renalog CKD nutrition
//! tracker: stage-derived daily limits, per-day intake accumulation against
//! an authoritative document store, a read-through cache with change
//! notifications, and the query facade that UI layers consume.

pub mod chat;
pub mod food_search;
pub mod history;
pub mod identity;
pub mod limits;
pub mod models;
pub mod store;
pub mod timestamp;
pub mod tracker;

pub use chat::{ChatClient, ChatContext, ChatError};
pub use food_search::UsdaClient;
pub use history::History;
pub use identity::{CurrentUser, IdentityProvider, StaticIdentity};
pub use limits::{limits_for_stage, LimitSet};
pub use models::{
    CkdStage, DailyRecord, FoodItem, MealEntry, MealType, Nutrient, NutrientTotals, ProfileUpdate,
    UserProfile,
};
pub use store::{DocumentStore, MealMutation, MemoryStore, RemoteStore, StoreError};
pub use timestamp::{date_key, local_date, RawTimestamp, TimestampError};
pub use tracker::{Clock, NutritionTracker, Subscription, SystemClock, TrackerError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

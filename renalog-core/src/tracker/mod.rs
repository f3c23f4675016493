//! Session-scoped nutrition tracker.
//!
//! `NutritionTracker` is the query facade screens consume: it owns the
//! read-through cache fronting the document store, applies ledger mutations,
//! and broadcasts change notifications. One tracker is constructed per
//! authenticated session and dropped on logout, so its cache can never leak
//! across a user switch.

mod cache;
mod ledger;
mod notify;

pub use notify::{ChangeListeners, Subscription};

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::history::History;
use crate::identity::{CurrentUser, IdentityProvider};
use crate::limits::{limits_for_stage, LimitSet};
use crate::models::{CkdStage, DailyRecord, MealEntry, NutrientTotals, ProfileUpdate, UserProfile};
use crate::store::{DocumentStore, StoreError};
use crate::timestamp::{local_date, RawTimestamp, TimestampError};
use cache::{CacheState, CachedData};

#[derive(Debug, Error)]
pub enum TrackerError {
    /// No signed-in user; never retried.
    #[error("no authenticated user")]
    Unauthenticated,
    #[error(transparent)]
    InvalidTimestamp(#[from] TimestampError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Wall-clock source, injectable so date rollover is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The local calendar date daily records are keyed by.
    fn today(&self) -> NaiveDate {
        local_date(self.now())
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct NutritionTracker {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
    cache: Mutex<CacheState>,
    listeners: ChangeListeners,
}

impl NutritionTracker {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_clock(store, identity, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            identity,
            clock,
            cache: Mutex::new(CacheState::Empty),
            listeners: ChangeListeners::new(),
        }
    }

    /// Registers a payload-free change listener, fired once per successful
    /// mutation. Dropping the returned subscription unregisters it.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn current_user(&self) -> Result<CurrentUser, TrackerError> {
        self.identity
            .current_user()
            .ok_or(TrackerError::Unauthenticated)
    }

    fn cache(&self) -> MutexGuard<'_, CacheState> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fills the cache if it is empty or was fetched for a different date.
    /// Idempotent; safe to call before every read.
    pub async fn ensure_loaded(&self) -> Result<(), TrackerError> {
        let user = self.current_user()?;
        let today = self.clock.today();
        if self.cache().fresh_for(today).is_some() {
            return Ok(());
        }

        tracing::debug!(user_id = %user.id, %today, "loading user data");
        let (profile, daily, records) = futures::try_join!(
            self.store.read_profile(&user.id),
            self.store.read_daily_record(&user.id, today),
            self.store.read_all_daily_records(&user.id),
        )?;

        let data = CachedData {
            profile: profile.unwrap_or_default(),
            daily: daily.unwrap_or_else(|| DailyRecord::empty(today)),
            history: History::new(records),
        };
        *self.cache() = CacheState::Fresh { date: today, data };
        Ok(())
    }

    /// `ensure_loaded` for read paths: store failures degrade to cached or
    /// default values with a warning instead of failing the render.
    async fn load_for_read(&self) -> Result<(), TrackerError> {
        match self.ensure_loaded().await {
            Ok(()) => Ok(()),
            Err(TrackerError::Store(e)) => {
                tracing::warn!(error = %e, "background refresh failed; serving cached/default values");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn read_cache<T>(&self, f: impl FnOnce(&CachedData) -> T) -> Option<T> {
        self.cache().cached().map(f)
    }

    // ----- Async getters (the recommended interface) -----

    pub async fn totals(&self) -> Result<NutrientTotals, TrackerError> {
        self.load_for_read().await?;
        Ok(self.read_cache(|d| d.daily.totals).unwrap_or_default())
    }

    pub async fn meals(&self) -> Result<Vec<MealEntry>, TrackerError> {
        self.load_for_read().await?;
        Ok(self.read_cache(|d| d.daily.meals.clone()).unwrap_or_default())
    }

    pub async fn profile(&self) -> Result<UserProfile, TrackerError> {
        self.load_for_read().await?;
        Ok(self.read_cache(|d| d.profile.clone()).unwrap_or_default())
    }

    /// Daily limits derived from the profile's CKD stage.
    pub async fn limits(&self) -> Result<LimitSet, TrackerError> {
        Ok(limits_for_stage(self.profile().await?.ckd_stage))
    }

    /// The effective fluid cap: a clinician-supplied profile value overrides
    /// the stage-derived default.
    pub async fn fluid_limit(&self) -> Result<Option<u32>, TrackerError> {
        let profile = self.profile().await?;
        Ok(profile
            .fluid_limit
            .or(limits_for_stage(profile.ckd_stage).fluid))
    }

    pub async fn history(&self) -> Result<History, TrackerError> {
        self.load_for_read().await?;
        Ok(self.read_cache(|d| d.history.clone()).unwrap_or_default())
    }

    // ----- Synchronous getters -----
    //
    // Cache-only, zero/default fallback; these never fetch and exist for
    // render paths that cannot await.

    pub fn cached_totals(&self) -> NutrientTotals {
        self.read_cache(|d| d.daily.totals).unwrap_or_default()
    }

    pub fn cached_meals(&self) -> Vec<MealEntry> {
        self.read_cache(|d| d.daily.meals.clone()).unwrap_or_default()
    }

    pub fn cached_profile(&self) -> UserProfile {
        self.read_cache(|d| d.profile.clone()).unwrap_or_default()
    }

    pub fn cached_stage(&self) -> CkdStage {
        self.read_cache(|d| d.profile.ckd_stage).unwrap_or_default()
    }

    pub fn cached_limits(&self) -> LimitSet {
        limits_for_stage(self.cached_stage())
    }

    // ----- Mutations -----

    /// Logs a meal into the record for the entry's calendar date. On success
    /// the cache is invalidated and listeners are notified; on failure the
    /// cache is untouched and no partial state is observable.
    pub async fn log_meal(&self, entry: MealEntry) -> Result<(), TrackerError> {
        let user = self.current_user()?;
        ledger::log_meal(self.store.as_ref(), &user.id, entry).await?;
        self.invalidate_and_notify();
        Ok(())
    }

    /// Deletes a previously logged meal. `Ok(false)` when the meal or its
    /// day record no longer exists (an expected race, not an error); in that
    /// case nothing changed and no notification fires.
    pub async fn delete_meal(
        &self,
        meal_id: &str,
        timestamp: &RawTimestamp,
    ) -> Result<bool, TrackerError> {
        let user = self.current_user()?;
        let date = local_date(timestamp.normalize()?);
        let removed = ledger::delete_meal(self.store.as_ref(), &user.id, meal_id, date).await?;
        if removed {
            self.invalidate_and_notify();
        }
        Ok(removed)
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), TrackerError> {
        let user = self.current_user()?;
        self.store.update_profile(&user.id, &update).await?;
        self.invalidate_and_notify();
        Ok(())
    }

    fn invalidate_and_notify(&self) {
        self.cache().invalidate();
        tracing::debug!("cache invalidated");
        self.listeners.notify();
    }
}

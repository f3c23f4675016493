//! In-process document store.
//!
//! Backs tests and the CLI's offline mode. Every mutation for a user is
//! applied under one lock, which gives the same no-lost-update guarantee
//! the hosted service provides with server-side increments.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DocumentStore, MealMutation, StoreError};
use crate::models::{DailyRecord, ProfileUpdate, UserProfile};
use crate::timestamp::date_key;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserDoc {
    profile: Option<UserProfile>,
    #[serde(default)]
    history: BTreeMap<NaiveDate, DailyRecord>,
}

/// Document store held in process memory, optionally persisted as a single
/// JSON file after each mutation.
pub struct MemoryStore {
    users: Mutex<HashMap<String, UserDoc>>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            path: None,
        }
    }

    /// A store persisted at `path`, loading existing contents if present.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        let users = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Decode(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Network(format!("{}: {}", path.display(), e))),
        };
        Ok(Self {
            users: Mutex::new(users),
            path: Some(path),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserDoc>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, users: &HashMap<String, UserDoc>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Network(format!("{}: {}", parent.display(), e)))?;
        }
        let bytes = serde_json::to_vec_pretty(users)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        std::fs::write(path, bytes)
            .map_err(|e| StoreError::Network(format!("{}: {}", path.display(), e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_daily_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, StoreError> {
        let users = self.lock();
        Ok(users
            .get(user_id)
            .and_then(|doc| doc.history.get(&date))
            .cloned())
    }

    async fn write_daily_record(
        &self,
        user_id: &str,
        record: &DailyRecord,
    ) -> Result<(), StoreError> {
        let mut users = self.lock();
        users
            .entry(user_id.to_string())
            .or_default()
            .history
            .insert(record.date, record.clone());
        self.persist(&users)
    }

    async fn apply_meal_mutation(
        &self,
        user_id: &str,
        date: NaiveDate,
        mutation: &MealMutation,
    ) -> Result<(), StoreError> {
        let mut users = self.lock();
        let record = users
            .get_mut(user_id)
            .and_then(|doc| doc.history.get_mut(&date))
            .ok_or_else(|| {
                StoreError::NotFound(format!("no daily record for {}", date_key(date)))
            })?;

        // Increment and list change land together, under the same lock.
        record.totals.add(&mutation.deltas());
        match mutation {
            MealMutation::Add(entry) => record.meals.push(entry.clone()),
            MealMutation::Remove(entry) => record.meals.retain(|m| m.id != entry.id),
        }
        self.persist(&users)
    }

    async fn read_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let users = self.lock();
        Ok(users.get(user_id).and_then(|doc| doc.profile.clone()))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError> {
        let mut users = self.lock();
        let doc = users.entry(user_id.to_string()).or_default();
        doc.profile = Some(update.to_profile());
        self.persist(&users)
    }

    async fn read_all_daily_records(&self, user_id: &str) -> Result<Vec<DailyRecord>, StoreError> {
        let users = self.lock();
        Ok(users
            .get(user_id)
            .map(|doc| doc.history.values().cloned().collect())
            .unwrap_or_default())
    }
}

//! HTTP client for the hosted document service.
//!
//! Thin adapter over the service's per-user document tree. Atomic
//! increment/array mutations are posted as [`MealMutation`] payloads and
//! applied server-side; this client never computes new totals itself.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{DocumentStore, MealMutation, StoreError};
use crate::models::{DailyRecord, ProfileUpdate, UserProfile};
use crate::timestamp::date_key;

pub struct RemoteStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
    }

    /// Maps response status to the store error taxonomy. `Ok(None)` for 404
    /// so callers can distinguish "absent" from failure.
    async fn checked(
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<Option<reqwest::Response>, StoreError> {
        let response = response.map_err(|e| StoreError::Network(e.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StoreError::Permission(status.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Network(format!("unexpected status {}", status)));
        }
        Ok(Some(response))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn read_daily_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, StoreError> {
        let path = format!("/users/{}/history/{}", user_id, date_key(date));
        match Self::checked(self.request(reqwest::Method::GET, &path).send().await).await? {
            Some(response) => Ok(Some(Self::decode(response).await?)),
            None => Ok(None),
        }
    }

    async fn write_daily_record(
        &self,
        user_id: &str,
        record: &DailyRecord,
    ) -> Result<(), StoreError> {
        let path = format!("/users/{}/history/{}", user_id, date_key(record.date));
        let response = self
            .request(reqwest::Method::PUT, &path)
            .json(record)
            .send()
            .await;
        Self::checked(response)
            .await?
            .ok_or_else(|| StoreError::NotFound(path))?;
        Ok(())
    }

    async fn apply_meal_mutation(
        &self,
        user_id: &str,
        date: NaiveDate,
        mutation: &MealMutation,
    ) -> Result<(), StoreError> {
        let path = format!("/users/{}/history/{}/mutations", user_id, date_key(date));
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(mutation)
            .send()
            .await;
        Self::checked(response)
            .await?
            .ok_or_else(|| StoreError::NotFound(path))?;
        Ok(())
    }

    async fn read_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let path = format!("/users/{}", user_id);
        match Self::checked(self.request(reqwest::Method::GET, &path).send().await).await? {
            Some(response) => Ok(Some(Self::decode(response).await?)),
            None => Ok(None),
        }
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError> {
        let path = format!("/users/{}", user_id);
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(update)
            .send()
            .await;
        Self::checked(response)
            .await?
            .ok_or_else(|| StoreError::NotFound(path))?;
        Ok(())
    }

    async fn read_all_daily_records(&self, user_id: &str) -> Result<Vec<DailyRecord>, StoreError> {
        let path = format!("/users/{}/history", user_id);
        match Self::checked(self.request(reqwest::Method::GET, &path).send().await).await? {
            Some(response) => Self::decode(response).await,
            // A user with no history yet is not an error.
            None => Ok(Vec::new()),
        }
    }
}

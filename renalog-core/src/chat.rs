//! Chat assistant integration.
//!
//! The core's only involvement is assembling a context object from the
//! tracker's current truth and posting it with the user's message. Callers
//! fall back to context-free chat when context assembly fails, so a store
//! outage degrades the assistant instead of breaking it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::LimitSet;
use crate::models::{CkdStage, NutrientTotals};
use crate::tracker::{NutritionTracker, TrackerError};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Network(String),
    #[error("chat response malformed: {0}")]
    Decode(String),
}

/// The medical and intake context sent alongside a chat message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub ckd_stage: CkdStage,
    pub dietary_preferences: Vec<String>,
    pub fluid_limit: Option<u32>,
    pub egfr_value: Option<f64>,
    pub doctor_notes: String,
    /// Today's accumulated intake.
    pub daily_nutrition: NutrientTotals,
    /// The stage-derived daily limits the intake is measured against.
    pub limits: LimitSet,
}

impl ChatContext {
    /// Builds the context from the tracker's current profile and totals.
    pub async fn assemble(tracker: &NutritionTracker) -> Result<Self, TrackerError> {
        let profile = tracker.profile().await?;
        let daily_nutrition = tracker.totals().await?;
        let limits = tracker.limits().await?;
        let fluid_limit = tracker.fluid_limit().await?;

        Ok(Self {
            ckd_stage: profile.ckd_stage,
            dietary_preferences: profile.dietary_preferences,
            fluid_limit,
            egfr_value: profile.egfr_value,
            doctor_notes: profile.doctor_notes,
            daily_nutrition,
            limits,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a ChatContext>,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

/// Client for the hosted chat-completion endpoint.
pub struct ChatClient {
    base_url: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Sends one message, optionally personalized with the user's context.
    pub async fn chat(
        &self,
        message: &str,
        context: Option<&ChatContext>,
    ) -> Result<String, ChatError> {
        let url = format!("{}/chatbot", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&ChatRequest { message, context })
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChatError::Network(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_context_assembly_for_fresh_user() {
        let tracker = NutritionTracker::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticIdentity::new("u1", "pat@example.com")),
        );

        let context = ChatContext::assemble(&tracker).await.unwrap();
        assert_eq!(context.ckd_stage, CkdStage::NotApplicable);
        assert!(context.daily_nutrition.is_zero());
        assert_eq!(context.limits.sodium, 2300.0);
    }

    #[test]
    fn test_request_omits_absent_context() {
        let json = serde_json::to_value(ChatRequest {
            message: "hello",
            context: None,
        })
        .unwrap();
        assert!(json.get("context").is_none());
    }
}

//! Trial dispatcher.
//!
//! Runs one trial end to end: submit the phrase to the scorer, wait a
//! random "thinking" delay, then post the reaction to the service's own
//! webhook endpoint. The dispatcher is stateless; experiment state is
//! mutated only by the aggregator, after this returns a definitive
//! outcome or failure.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::JoyScorer;

/// Dispatches individual trials to the external scorer.
pub struct TrialDispatcher {
    scorer: Arc<dyn JoyScorer>,
    http: Client,
    webhook_url: String,
}

impl TrialDispatcher {
    pub fn new(scorer: Arc<dyn JoyScorer>, webhook_url: impl Into<String>) -> Self {
        Self { scorer, http: Client::new(), webhook_url: webhook_url.into() }
    }

    /// Run one trial: score, think, notify.
    ///
    /// The delay is uniform in [0, 1) seconds, so concurrent trials
    /// finish in no particular order. It suspends the task rather than
    /// blocking; everything else keeps running. Any failure along the
    /// way, including delivering the callback, surfaces as
    /// [`DomainError::TrialFailed`].
    #[instrument(skip(self, phrase), err)]
    pub async fn run_trial(&self, trial_id: Uuid, phrase: &str) -> DomainResult<bool> {
        let joy_sparked = self.scorer.score(phrase).await?;

        let delay = rand::rng().random_range(0.0..1.0);
        debug!(%trial_id, delay_secs = delay, "scorer is contemplating");
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;

        self.post_reaction(trial_id, joy_sparked).await?;

        Ok(joy_sparked)
    }

    async fn post_reaction(&self, trial_id: Uuid, joy_sparked: bool) -> DomainResult<()> {
        let payload = json!({
            "affirmation_id": trial_id,
            "joy_sparked": joy_sparked,
            "timestamp": Utc::now(),
        });

        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::TrialFailed(format!("reaction callback failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(DomainError::TrialFailed(format!("reaction callback returned {status}")));
        }

        Ok(())
    }
}

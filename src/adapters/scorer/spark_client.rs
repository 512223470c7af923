//! HTTP client for the external joy scorer.
//!
//! Wraps the spark endpoint, an opaque boolean classifier. All methods
//! map HTTP / network errors to [`DomainError::TrialFailed`] so a bad
//! call surfaces as a single failed trial rather than aborting the
//! experiment.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ScorerConfig;
use crate::domain::ports::JoyScorer;

#[derive(Debug, Serialize)]
struct SparkRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct SparkResponse {
    result: bool,
}

/// HTTP client for the spark scoring endpoint.
#[derive(Debug, Clone)]
pub struct SparkClient {
    http: Client,
    endpoint_url: String,
}

impl SparkClient {
    /// Create a client from the scorer configuration.
    pub fn new(config: &ScorerConfig) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::TrialFailed(format!("failed to build scorer client: {e}")))?;

        Ok(Self { http, endpoint_url: config.endpoint_url.clone() })
    }
}

#[async_trait]
impl JoyScorer for SparkClient {
    async fn score(&self, phrase: &str) -> DomainResult<bool> {
        let resp = self
            .http
            .post(&self.endpoint_url)
            .json(&SparkRequest { input: phrase })
            .send()
            .await
            .map_err(|e| DomainError::TrialFailed(format!("scorer request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::TrialFailed(format!("scorer returned {status}: {body}")));
        }

        let parsed = resp
            .json::<SparkResponse>()
            .await
            .map_err(|e| DomainError::TrialFailed(format!("scorer response parse failed: {e}")))?;

        Ok(parsed.result)
    }
}

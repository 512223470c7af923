//! Request and response types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Generic message response
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Request to share an affirmation with the scorer
#[derive(Debug, Default, Deserialize)]
pub struct AffirmationRequest {
    /// Phrase to test; the current champion is used when absent
    #[serde(default)]
    pub suggested_affirmation: Option<String>,
}

/// Response when an affirmation is shared
#[derive(Debug, Serialize)]
pub struct AffirmationResponse {
    pub affirmation_id: Uuid,
    pub message: String,
}

/// Webhook callback payload with the reaction for one trial
#[derive(Debug, Deserialize)]
pub struct WebhookCallback {
    pub affirmation_id: Uuid,
    pub joy_sparked: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Request to launch an experiment
#[derive(Debug, Deserialize)]
pub struct ExperimentRequest {
    /// Challenger phrase to test against the champion
    pub new_affirmation: String,
    /// Number of trials to run
    pub runs: i64,
}

/// Response when an experiment is accepted
#[derive(Debug, Serialize)]
pub struct ExperimentAccepted {
    pub experiment_id: Uuid,
    pub new_affirmation: String,
    pub runs: u32,
}

/// Query parameters for history endpoints
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

const fn default_history_limit() -> i64 {
    50
}

/// Domain error wrapper implementing the HTTP status mapping.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::InvalidRunCount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::ExperimentAlreadyActive(_) => StatusCode::CONFLICT,
            DomainError::ExperimentNotFound(_) | DomainError::AffirmationNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

//! HTTP route handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::{AffirmationResult, ChampionPhrase, Experiment};
use crate::services::{AffirmationService, ExperimentLauncher, ExperimentService, TrialDispatcher};

use super::types::{
    AffirmationRequest, AffirmationResponse, ApiError, ExperimentAccepted, ExperimentRequest,
    HistoryQuery, Message, WebhookCallback,
};

/// Shared application state for the HTTP layer.
#[derive(Clone)]
pub struct AppState {
    pub launcher: Arc<ExperimentLauncher>,
    pub experiments: Arc<ExperimentService>,
    pub affirmations: Arc<AffirmationService>,
    pub dispatcher: Arc<TrialDispatcher>,
}

/// Root endpoint returning a welcome message
pub async fn root() -> Json<Message> {
    Json(Message {
        message: "Welcome to sparklab. Share your words of affirmation and see if they spark joy."
            .to_string(),
        timestamp: Utc::now(),
    })
}

/// Health check endpoint
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": Utc::now() }))
}

/// Share a phrase with the scorer; returns immediately and processes
/// asynchronously. Uses the current champion when no phrase is given.
pub async fn share_affirmation(
    State(state): State<AppState>,
    Json(request): Json<AffirmationRequest>,
) -> Result<(StatusCode, Json<AffirmationResponse>), ApiError> {
    let text = match request.suggested_affirmation {
        Some(text) => text,
        None => state.experiments.champion().await?.phrase,
    };

    let record = state.affirmations.share(&text).await?;

    // Standalone trial: the reaction lands on the record through the
    // webhook; there is no experiment to report to.
    let dispatcher = state.dispatcher.clone();
    let trial_id = record.id;
    tokio::spawn(async move {
        if let Err(err) = dispatcher.run_trial(trial_id, &record.text).await {
            warn!(%trial_id, %err, "standalone trial failed");
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(AffirmationResponse {
            affirmation_id: trial_id,
            message: "Your words have been shared. The scorer is contemplating.".to_string(),
        }),
    ))
}

/// Webhook endpoint receiving reaction callbacks
pub async fn webhook_reaction(
    State(state): State<AppState>,
    Json(callback): Json<WebhookCallback>,
) -> Result<Json<Value>, ApiError> {
    let received_at = callback.timestamp.unwrap_or_else(Utc::now);
    state
        .affirmations
        .record_reaction(callback.affirmation_id, callback.joy_sparked, received_at)
        .await?;

    Ok(Json(json!({ "status": "received", "affirmation_id": callback.affirmation_id })))
}

/// Launch an experiment testing a challenger phrase against the champion
pub async fn launch_experiment(
    State(state): State<AppState>,
    Json(request): Json<ExperimentRequest>,
) -> Result<(StatusCode, Json<ExperimentAccepted>), ApiError> {
    let experiment = state.launcher.launch(&request.new_affirmation, request.runs).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ExperimentAccepted {
            experiment_id: experiment.id,
            new_affirmation: experiment.variant_b,
            runs: experiment.target_runs,
        }),
    ))
}

/// List experiments, newest first
pub async fn experiment_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Experiment>>, ApiError> {
    Ok(Json(state.experiments.history(query.limit).await?))
}

/// List trial records, newest first
pub async fn affirmation_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<AffirmationResult>>, ApiError> {
    Ok(Json(state.affirmations.history(query.limit).await?))
}

/// Get the current champion phrase
pub async fn get_champion(State(state): State<AppState>) -> Result<Json<ChampionPhrase>, ApiError> {
    Ok(Json(state.experiments.champion().await?))
}

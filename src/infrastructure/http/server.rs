//! HTTP server wiring.
//!
//! Builds the connection pool, repositories, and services from the
//! loaded configuration and serves the axum router.

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::info;

use crate::adapters::scorer::SparkClient;
use crate::adapters::sqlite::{
    all_embedded_migrations, create_pool, Migrator, SqliteAffirmationRepository,
    SqliteChampionStore, SqliteExperimentRepository,
};
use crate::domain::models::Config;
use crate::domain::ports::JoyScorer;
use crate::services::{AffirmationService, ExperimentLauncher, ExperimentService, TrialDispatcher};

use super::handlers::{self, AppState};

/// Build the application router for the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/affirmation", post(handlers::share_affirmation))
        .route("/webhook/reaction", post(handlers::webhook_reaction))
        .route("/experiment", post(handlers::launch_experiment))
        .route("/experiment/history", get(handlers::experiment_history))
        .route("/affirmations/history", get(handlers::affirmation_history))
        .route("/champion", get(handlers::get_champion))
        .with_state(state)
}

/// Build the full application state from configuration: pool, migrations,
/// repositories, and services.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let database_url = format!("sqlite:{}", config.database.path);
    let pool = create_pool(&database_url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;

    let applied = Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to run database migrations")?;
    if applied > 0 {
        info!(applied, "database migrations applied");
    }

    let experiment_repo = Arc::new(SqliteExperimentRepository::new(pool.clone()));
    let affirmation_repo = Arc::new(SqliteAffirmationRepository::new(pool.clone()));
    let champion_store = Arc::new(SqliteChampionStore::new(pool));

    let scorer: Arc<dyn JoyScorer> =
        Arc::new(SparkClient::new(&config.scorer).context("Failed to build scorer client")?);

    let experiments = Arc::new(ExperimentService::new(experiment_repo, champion_store));
    let affirmations = Arc::new(AffirmationService::new(affirmation_repo.clone()));
    let dispatcher = Arc::new(TrialDispatcher::new(scorer, config.server.webhook_url.clone()));
    let launcher =
        Arc::new(ExperimentLauncher::new(experiments.clone(), affirmation_repo, dispatcher.clone()));

    Ok(AppState { launcher, experiments, affirmations, dispatcher })
}

/// Run the HTTP service until the listener fails.
pub async fn serve(config: Config) -> Result<()> {
    info!("Starting sparklab HTTP service");
    info!("Database path: {}", config.database.path);

    let state = build_state(&config).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HTTP service listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server exited")?;

    Ok(())
}

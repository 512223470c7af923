use crate::domain::errors::DomainResult;
use crate::domain::models::Experiment;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository port for experiment persistence operations
#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    /// Insert a new experiment
    async fn insert(&self, experiment: &Experiment) -> DomainResult<()>;

    /// Get an experiment by ID
    async fn get(&self, id: Uuid) -> DomainResult<Option<Experiment>>;

    /// Find the currently pending experiment, if any
    async fn find_pending(&self) -> DomainResult<Option<Experiment>>;

    /// Update an existing experiment
    async fn update(&self, experiment: &Experiment) -> DomainResult<()>;

    /// Persist a settled experiment and, when the challenger won, replace
    /// the champion phrase in the same durable update. The champion swap
    /// only applies while the stored phrase still equals `expected_champion`.
    async fn update_and_promote(
        &self,
        experiment: &Experiment,
        expected_champion: &str,
        new_champion: &str,
    ) -> DomainResult<bool>;

    /// List experiments ordered by recency
    async fn list_recent(&self, limit: i64) -> DomainResult<Vec<Experiment>>;
}

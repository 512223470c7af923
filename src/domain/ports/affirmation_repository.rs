use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::AffirmationResult;
use async_trait::async_trait;

/// Repository port for affirmation trial records
#[async_trait]
pub trait AffirmationRepository: Send + Sync {
    /// Insert a new trial record
    async fn insert(&self, record: &AffirmationResult) -> DomainResult<()>;

    /// Get a trial record by ID
    async fn get(&self, id: Uuid) -> DomainResult<Option<AffirmationResult>>;

    /// Record the reaction for a trial, once. Returns `false` when the
    /// reaction was already recorded (duplicate callback) and leaves the
    /// row untouched.
    async fn record_reaction(
        &self,
        id: Uuid,
        joy_sparked: bool,
        received_at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// List trial records ordered by recency
    async fn list_recent(&self, limit: i64) -> DomainResult<Vec<AffirmationResult>>;
}

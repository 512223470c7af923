//! Affirmation record service.
//!
//! Maintains the per-trial log: a record is created when a phrase is
//! shared and its reaction is filled in exactly once when the webhook
//! callback arrives.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AffirmationResult;
use crate::domain::ports::AffirmationRepository;

/// Service for the affirmation trial log.
pub struct AffirmationService {
    repo: Arc<dyn AffirmationRepository>,
}

impl AffirmationService {
    pub fn new(repo: Arc<dyn AffirmationRepository>) -> Self {
        Self { repo }
    }

    /// Create the record for a newly shared phrase, reaction unset.
    #[instrument(skip(self, text), err)]
    pub async fn share(&self, text: &str) -> DomainResult<AffirmationResult> {
        let record = AffirmationResult::new(text);
        self.repo.insert(&record).await?;
        info!(affirmation_id = %record.id, "affirmation shared");
        Ok(record)
    }

    /// Record a webhook reaction.
    ///
    /// Duplicates and unknown ids are logged and swallowed: the sender
    /// is an asynchronous callback with nobody waiting on an error.
    #[instrument(skip(self), err)]
    pub async fn record_reaction(
        &self,
        id: Uuid,
        joy_sparked: bool,
        received_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        match self.repo.record_reaction(id, joy_sparked, received_at).await {
            Ok(true) => {
                info!(affirmation_id = %id, joy_sparked, "reaction recorded");
                Ok(())
            }
            Ok(false) => {
                warn!(affirmation_id = %id, "duplicate reaction callback ignored");
                Ok(())
            }
            Err(DomainError::AffirmationNotFound(_)) => {
                warn!(affirmation_id = %id, "reaction callback for unknown affirmation dropped");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// List trial records, newest first.
    pub async fn history(&self, limit: i64) -> DomainResult<Vec<AffirmationResult>> {
        self.repo.list_recent(limit).await
    }
}

//! Domain errors for the sparklab experiment system.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the sparklab system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Experiment not found: {0}")]
    ExperimentNotFound(Uuid),

    #[error("Affirmation not found: {0}")]
    AffirmationNotFound(Uuid),

    #[error("An experiment is already active: {0}")]
    ExperimentAlreadyActive(Uuid),

    #[error("Invalid run count: {0}. Must be at least 1")]
    InvalidRunCount(i64),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition { from: String, to: String, reason: String },

    #[error("Trial failed: {0}")]
    TrialFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

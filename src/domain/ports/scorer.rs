use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// Port for the external boolean classifier.
///
/// Implementations submit a phrase and return whether it sparked joy. Any
/// transport or format failure surfaces as
/// [`DomainError::TrialFailed`](crate::domain::errors::DomainError::TrialFailed).
#[async_trait]
pub trait JoyScorer: Send + Sync {
    /// Score a phrase, returning the positive/negative signal
    async fn score(&self, phrase: &str) -> DomainResult<bool>;
}

use crate::domain::errors::DomainResult;
use crate::domain::models::ChampionPhrase;
use async_trait::async_trait;

/// Store port for the singleton champion phrase.
///
/// Reads go through this port; the replace-on-promotion write happens in
/// the same transaction as the experiment settlement (see
/// [`ExperimentRepository::update_and_promote`](super::ExperimentRepository::update_and_promote))
/// and compares against the expected current phrase before swapping.
#[async_trait]
pub trait ChampionStore: Send + Sync {
    /// Get the current champion phrase
    async fn get(&self) -> DomainResult<ChampionPhrase>;
}

//! SQLite implementation of the ChampionStore.
//!
//! The champion is a single seeded row; the promotion write lives in
//! [`SqliteExperimentRepository::update_and_promote`](super::SqliteExperimentRepository)
//! so experiment settlement and the swap share one transaction.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ChampionPhrase;
use crate::domain::ports::ChampionStore;

use super::parse_datetime;

#[derive(Clone)]
pub struct SqliteChampionStore {
    pool: SqlitePool,
}

impl SqliteChampionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChampionStore for SqliteChampionStore {
    async fn get(&self) -> DomainResult<ChampionPhrase> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT phrase, updated_at FROM champion_phrase WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        let (phrase, updated_at) = row.ok_or_else(|| {
            DomainError::DatabaseError("champion phrase row is missing; run migrations".to_string())
        })?;

        Ok(ChampionPhrase { phrase, updated_at: parse_datetime(&updated_at)? })
    }
}

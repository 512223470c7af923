//! SQLite implementation of the AffirmationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AffirmationResult;
use crate::domain::ports::AffirmationRepository;

use super::{parse_datetime, parse_optional_datetime, parse_uuid};

#[derive(Clone)]
pub struct SqliteAffirmationRepository {
    pool: SqlitePool,
}

impl SqliteAffirmationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AffirmationRepository for SqliteAffirmationRepository {
    async fn insert(&self, record: &AffirmationResult) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO affirmation_results (id, text, joy_sparked, created_at, callback_received_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(&record.text)
        .bind(record.joy_sparked)
        .bind(record.created_at.to_rfc3339())
        .bind(record.callback_received_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<AffirmationResult>> {
        let row: Option<AffirmationRow> =
            sqlx::query_as("SELECT * FROM affirmation_results WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn record_reaction(
        &self,
        id: Uuid,
        joy_sparked: bool,
        received_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        // The guard on callback_received_at makes duplicate callbacks
        // no-ops without a separate read.
        let result = sqlx::query(
            r#"UPDATE affirmation_results SET joy_sparked = ?, callback_received_at = ?
               WHERE id = ? AND callback_received_at IS NULL"#,
        )
        .bind(joy_sparked)
        .bind(received_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Distinguish a duplicate from a dangling id.
        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM affirmation_results WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        match exists {
            Some(_) => Ok(false),
            None => Err(DomainError::AffirmationNotFound(id)),
        }
    }

    async fn list_recent(&self, limit: i64) -> DomainResult<Vec<AffirmationResult>> {
        let rows: Vec<AffirmationRow> =
            sqlx::query_as("SELECT * FROM affirmation_results ORDER BY created_at DESC LIMIT ?")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AffirmationRow {
    id: String,
    text: String,
    joy_sparked: Option<bool>,
    created_at: String,
    callback_received_at: Option<String>,
}

impl TryFrom<AffirmationRow> for AffirmationResult {
    type Error = DomainError;

    fn try_from(row: AffirmationRow) -> Result<Self, Self::Error> {
        Ok(AffirmationResult {
            id: parse_uuid(&row.id)?,
            text: row.text,
            joy_sparked: row.joy_sparked,
            created_at: parse_datetime(&row.created_at)?,
            callback_received_at: parse_optional_datetime(row.callback_received_at)?,
        })
    }
}

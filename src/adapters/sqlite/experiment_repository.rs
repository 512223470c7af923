//! SQLite implementation of the ExperimentRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Experiment, ExperimentStatus};
use crate::domain::ports::ExperimentRepository;

use super::{parse_datetime, parse_uuid};

#[derive(Clone)]
pub struct SqliteExperimentRepository {
    pool: SqlitePool,
}

impl SqliteExperimentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExperimentRepository for SqliteExperimentRepository {
    async fn insert(&self, experiment: &Experiment) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO experiments (id, variant_a, variant_b, variant_a_runs, variant_a_successes,
               variant_b_runs, variant_b_successes, failed_runs, target_runs,
               variant_a_approval_rate, variant_b_approval_rate, status, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(experiment.id.to_string())
        .bind(&experiment.variant_a)
        .bind(&experiment.variant_b)
        .bind(i64::from(experiment.variant_a_runs))
        .bind(i64::from(experiment.variant_a_successes))
        .bind(i64::from(experiment.variant_b_runs))
        .bind(i64::from(experiment.variant_b_successes))
        .bind(i64::from(experiment.failed_runs))
        .bind(i64::from(experiment.target_runs))
        .bind(experiment.variant_a_approval_rate)
        .bind(experiment.variant_b_approval_rate)
        .bind(experiment.status.as_str())
        .bind(experiment.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Experiment>> {
        let row: Option<ExperimentRow> = sqlx::query_as("SELECT * FROM experiments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_pending(&self) -> DomainResult<Option<Experiment>> {
        let row: Option<ExperimentRow> =
            sqlx::query_as("SELECT * FROM experiments WHERE status = 'pending' LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, experiment: &Experiment) -> DomainResult<()> {
        let result = update_experiment_query(experiment).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ExperimentNotFound(experiment.id));
        }

        Ok(())
    }

    async fn update_and_promote(
        &self,
        experiment: &Experiment,
        expected_champion: &str,
        new_champion: &str,
    ) -> DomainResult<bool> {
        let mut txn = self.pool.begin().await?;

        let result = update_experiment_query(experiment).execute(&mut *txn).await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::ExperimentNotFound(experiment.id));
        }

        // Compare-and-swap: only replace the champion while it still holds
        // the phrase this experiment tested against.
        let swapped = sqlx::query(
            "UPDATE champion_phrase SET phrase = ?, updated_at = ? WHERE id = 1 AND phrase = ?",
        )
        .bind(new_champion)
        .bind(Utc::now().to_rfc3339())
        .bind(expected_champion)
        .execute(&mut *txn)
        .await?;

        txn.commit().await?;

        Ok(swapped.rows_affected() > 0)
    }

    async fn list_recent(&self, limit: i64) -> DomainResult<Vec<Experiment>> {
        let rows: Vec<ExperimentRow> =
            sqlx::query_as("SELECT * FROM experiments ORDER BY created_at DESC LIMIT ?")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

fn update_experiment_query(
    experiment: &Experiment,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(
        r#"UPDATE experiments SET variant_a_runs = ?, variant_a_successes = ?,
           variant_b_runs = ?, variant_b_successes = ?, failed_runs = ?,
           variant_a_approval_rate = ?, variant_b_approval_rate = ?, status = ?
           WHERE id = ?"#,
    )
    .bind(i64::from(experiment.variant_a_runs))
    .bind(i64::from(experiment.variant_a_successes))
    .bind(i64::from(experiment.variant_b_runs))
    .bind(i64::from(experiment.variant_b_successes))
    .bind(i64::from(experiment.failed_runs))
    .bind(experiment.variant_a_approval_rate)
    .bind(experiment.variant_b_approval_rate)
    .bind(experiment.status.as_str())
    .bind(experiment.id.to_string())
}

#[derive(sqlx::FromRow)]
struct ExperimentRow {
    id: String,
    variant_a: String,
    variant_b: String,
    variant_a_runs: i64,
    variant_a_successes: i64,
    variant_b_runs: i64,
    variant_b_successes: i64,
    failed_runs: i64,
    target_runs: i64,
    variant_a_approval_rate: Option<f64>,
    variant_b_approval_rate: Option<f64>,
    status: String,
    created_at: String,
}

impl TryFrom<ExperimentRow> for Experiment {
    type Error = DomainError;

    fn try_from(row: ExperimentRow) -> Result<Self, Self::Error> {
        let status = ExperimentStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid status: {}", row.status)))?;

        Ok(Experiment {
            id: parse_uuid(&row.id)?,
            variant_a: row.variant_a,
            variant_b: row.variant_b,
            variant_a_runs: counter(row.variant_a_runs)?,
            variant_a_successes: counter(row.variant_a_successes)?,
            variant_b_runs: counter(row.variant_b_runs)?,
            variant_b_successes: counter(row.variant_b_successes)?,
            failed_runs: counter(row.failed_runs)?,
            target_runs: counter(row.target_runs)?,
            variant_a_approval_rate: row.variant_a_approval_rate,
            variant_b_approval_rate: row.variant_b_approval_rate,
            status,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

fn counter(value: i64) -> DomainResult<u32> {
    u32::try_from(value)
        .map_err(|_| DomainError::SerializationError(format!("Invalid counter value: {value}")))
}

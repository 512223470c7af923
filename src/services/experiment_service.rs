//! Experiment aggregation service.
//!
//! Owns the experiment lifecycle: validated creation, outcome
//! aggregation, settlement, and champion promotion. This is the single
//! mutation point for experiment state; every `record_outcome` call for
//! the same experiment runs under that experiment's lock so concurrent
//! trials can never lose counter increments or both observe the
//! completion condition.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoff;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ChampionPhrase, Experiment, ExperimentProgress, ExperimentStatus, TrialOutcome,
};
use crate::domain::ports::{ChampionStore, ExperimentRepository};

/// Per-experiment aggregation state: the trial ids already counted.
/// Guarded by the per-experiment lock, so holding it serializes the whole
/// read-modify-write-check sequence.
type TrialLedger = Arc<Mutex<HashSet<Uuid>>>;

/// Service coordinating experiment creation, outcome aggregation, and
/// champion promotion.
pub struct ExperimentService {
    experiments: Arc<dyn ExperimentRepository>,
    champion: Arc<dyn ChampionStore>,
    /// One entry per in-flight experiment, pruned on settlement.
    ledgers: Mutex<HashMap<Uuid, TrialLedger>>,
    /// Serializes the pending-check-then-insert in `launch`.
    launch_lock: Mutex<()>,
}

impl ExperimentService {
    pub fn new(experiments: Arc<dyn ExperimentRepository>, champion: Arc<dyn ChampionStore>) -> Self {
        Self {
            experiments,
            champion,
            ledgers: Mutex::new(HashMap::new()),
            launch_lock: Mutex::new(()),
        }
    }

    /// Create a new pending experiment testing `candidate_phrase` against
    /// the current champion.
    ///
    /// Rejects a non-positive run count and refuses to start while
    /// another experiment is pending. On rejection or storage failure no
    /// experiment record exists.
    #[instrument(skip(self), err)]
    pub async fn launch(&self, candidate_phrase: &str, target_runs: i64) -> DomainResult<Experiment> {
        let Ok(target_runs) = u32::try_from(target_runs) else {
            return Err(DomainError::InvalidRunCount(target_runs));
        };
        if target_runs == 0 {
            return Err(DomainError::InvalidRunCount(0));
        }

        let _guard = self.launch_lock.lock().await;

        if let Some(active) = self.experiments.find_pending().await? {
            return Err(DomainError::ExperimentAlreadyActive(active.id));
        }

        let champion = self.champion.get().await?;
        let experiment = Experiment::new(champion.phrase, candidate_phrase, target_runs);
        self.experiments.insert(&experiment).await?;

        info!(
            experiment_id = %experiment.id,
            target_runs,
            challenger = candidate_phrase,
            "experiment launched"
        );

        Ok(experiment)
    }

    /// Record one trial outcome against an experiment.
    ///
    /// Serialized per experiment id. Duplicate reports for the same
    /// trial id and reports against unknown or already-settled
    /// experiments are logged and swallowed: trials are fire-and-forget,
    /// there is no caller left to answer to. Only a persistence failure
    /// that survives retries is returned to the caller.
    #[instrument(skip(self), err)]
    pub async fn record_outcome(
        &self,
        experiment_id: Uuid,
        trial_id: Uuid,
        outcome: TrialOutcome,
    ) -> DomainResult<()> {
        let ledger = self.ledger_for(experiment_id).await;
        let mut counted = ledger.lock().await;

        if counted.contains(&trial_id) {
            warn!(%experiment_id, %trial_id, "duplicate trial outcome ignored");
            return Ok(());
        }

        let Some(mut experiment) = self.experiments.get(experiment_id).await? else {
            error!(%experiment_id, %trial_id, "outcome for unknown experiment dropped");
            return Ok(());
        };

        let progress = match experiment.record(outcome) {
            Ok(progress) => progress,
            Err(err) => {
                warn!(%experiment_id, %trial_id, %err, "stale trial outcome ignored");
                return Ok(());
            }
        };

        match progress {
            ExperimentProgress::InFlight => {
                self.persist_with_retry(&experiment).await?;
            }
            ExperimentProgress::Completed { promote_challenger } => {
                self.settle(&experiment, promote_challenger).await?;
            }
        }

        counted.insert(trial_id);

        if experiment.is_terminal() {
            drop(counted);
            self.ledgers.lock().await.remove(&experiment_id);
        }

        Ok(())
    }

    /// Abort a pending experiment.
    ///
    /// The fallback for a launcher that cannot even record failed runs;
    /// goes through the same transition machine as settlement, so an
    /// already-settled experiment is left untouched.
    #[instrument(skip(self), err)]
    pub async fn abort(&self, experiment_id: Uuid) -> DomainResult<()> {
        let ledger = self.ledger_for(experiment_id).await;
        let _counted = ledger.lock().await;

        let Some(mut experiment) = self.experiments.get(experiment_id).await? else {
            error!(%experiment_id, "abort for unknown experiment dropped");
            return Ok(());
        };

        experiment.transition_to(ExperimentStatus::Failed)?;
        self.persist_with_retry(&experiment).await?;

        warn!(%experiment_id, "experiment aborted");

        drop(_counted);
        self.ledgers.lock().await.remove(&experiment_id);

        Ok(())
    }

    /// Get an experiment by id.
    pub async fn get(&self, experiment_id: Uuid) -> DomainResult<Option<Experiment>> {
        self.experiments.get(experiment_id).await
    }

    /// List experiments, newest first.
    pub async fn history(&self, limit: i64) -> DomainResult<Vec<Experiment>> {
        self.experiments.list_recent(limit).await
    }

    /// The current champion phrase.
    pub async fn champion(&self) -> DomainResult<ChampionPhrase> {
        self.champion.get().await
    }

    async fn ledger_for(&self, experiment_id: Uuid) -> TrialLedger {
        self.ledgers
            .lock()
            .await
            .entry(experiment_id)
            .or_insert_with(|| Arc::new(Mutex::new(HashSet::new())))
            .clone()
    }

    /// Persist a settled experiment and, when the challenger won, the
    /// champion swap in the same durable update.
    async fn settle(&self, experiment: &Experiment, promote_challenger: bool) -> DomainResult<()> {
        if promote_challenger {
            let swapped = retry_persist(|| {
                self.experiments.update_and_promote(
                    experiment,
                    &experiment.variant_a,
                    &experiment.variant_b,
                )
            })
            .await?;

            if swapped {
                info!(
                    experiment_id = %experiment.id,
                    champion = %experiment.variant_b,
                    "challenger promoted to champion"
                );
            } else {
                // The stored champion no longer matches what this
                // experiment tested against; the swap did not apply.
                warn!(
                    experiment_id = %experiment.id,
                    "champion changed since launch, promotion skipped"
                );
            }
        } else {
            self.persist_with_retry(experiment).await?;
        }

        info!(
            experiment_id = %experiment.id,
            variant_a_approval_rate = ?experiment.variant_a_approval_rate,
            variant_b_approval_rate = ?experiment.variant_b_approval_rate,
            failed_runs = experiment.failed_runs,
            "experiment completed"
        );

        Ok(())
    }

    async fn persist_with_retry(&self, experiment: &Experiment) -> DomainResult<()> {
        retry_persist(|| self.experiments.update(experiment)).await
    }
}

/// Retry a persistence operation with bounded exponential backoff.
///
/// Transient database errors are retried for a few seconds; anything
/// else is permanent. Exhaustion is logged at error level so a lost
/// update is alerted on rather than silently dropped.
async fn retry_persist<T, F, Fut>(operation: F) -> DomainResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = DomainResult<T>>,
{
    let policy = ExponentialBackoff {
        max_elapsed_time: Some(Duration::from_secs(5)),
        ..ExponentialBackoff::default()
    };

    let mut operation = operation;
    let result = backoff::future::retry(policy, || {
        let fut = operation();
        async {
            fut.await.map_err(|err| match err {
                DomainError::DatabaseError(_) => backoff::Error::transient(err),
                other => backoff::Error::permanent(other),
            })
        }
    })
    .await;

    if let Err(err) = &result {
        error!(%err, "experiment update lost after retries");
    }

    result
}

//! Experiment launcher.
//!
//! Creates the experiment through the aggregation service, then fires
//! off the requested number of trials as independent tasks. Each trial
//! picks champion or challenger with a fair coin and reports its outcome
//! back to the aggregator; the launcher does not wait for any of them.

use std::sync::Arc;

use rand::Rng;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AffirmationResult, Experiment, TrialOutcome, Variant};
use crate::domain::ports::AffirmationRepository;
use crate::services::{ExperimentService, TrialDispatcher};

/// Launches experiments and dispatches their trials.
pub struct ExperimentLauncher {
    experiments: Arc<ExperimentService>,
    affirmations: Arc<dyn AffirmationRepository>,
    dispatcher: Arc<TrialDispatcher>,
}

impl ExperimentLauncher {
    pub fn new(
        experiments: Arc<ExperimentService>,
        affirmations: Arc<dyn AffirmationRepository>,
        dispatcher: Arc<TrialDispatcher>,
    ) -> Self {
        Self { experiments, affirmations, dispatcher }
    }

    /// Validate, create, and start an experiment.
    ///
    /// Returns as soon as the experiment record exists and its trials
    /// are spawned; trials complete in the background in no particular
    /// order. A trial that cannot even be scheduled is reported to the
    /// aggregator as a failed run so the experiment still settles.
    #[instrument(skip(self), err)]
    pub async fn launch(&self, candidate_phrase: &str, target_runs: i64) -> DomainResult<Experiment> {
        let experiment = self.experiments.launch(candidate_phrase, target_runs).await?;

        for _ in 0..experiment.target_runs {
            let variant = if rand::rng().random_bool(0.5) { Variant::A } else { Variant::B };
            self.spawn_trial(&experiment, variant).await;
        }

        Ok(experiment)
    }

    async fn spawn_trial(&self, experiment: &Experiment, variant: Variant) {
        let experiment_id = experiment.id;
        let record = AffirmationResult::new(experiment.phrase_for(variant));

        if let Err(err) = self.affirmations.insert(&record).await {
            // The trial never started; the slot must still be accounted
            // for or the experiment hangs short of its target.
            warn!(%experiment_id, %err, "trial could not be scheduled, recording failed run");
            self.record_or_abort(experiment_id, record.id, TrialOutcome::Failed).await;
            return;
        }

        let experiments = self.experiments.clone();
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            let outcome = match dispatcher.run_trial(record.id, &record.text).await {
                Ok(joy_sparked) => TrialOutcome::Scored { variant, joy_sparked },
                Err(err) => {
                    warn!(%experiment_id, trial_id = %record.id, %err, "trial failed");
                    TrialOutcome::Failed
                }
            };

            if let Err(err) = experiments.record_outcome(experiment_id, record.id, outcome).await {
                error!(%experiment_id, trial_id = %record.id, %err, "failed to record trial outcome");
            }
        });
    }

    /// Record a failed run; when even that cannot be persisted, fail the
    /// whole experiment so it does not hang in pending forever.
    async fn record_or_abort(&self, experiment_id: Uuid, trial_id: Uuid, outcome: TrialOutcome) {
        if let Err(err) = self.experiments.record_outcome(experiment_id, trial_id, outcome).await {
            error!(%experiment_id, %err, "failed to record failed run, aborting experiment");
            if let Err(err) = self.experiments.abort(experiment_id).await {
                error!(%experiment_id, %err, "failed to abort experiment");
            }
        }
    }
}

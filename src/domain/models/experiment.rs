//! Experiment domain model.
//!
//! An experiment is a bounded sequence of trials comparing the current
//! champion phrase (variant A) against a challenger (variant B). Each
//! trial outcome is recorded against exactly one counter; when the
//! counters account for every targeted run the experiment settles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Status of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    /// Trials are still outstanding
    Pending,
    /// Every targeted run has been accounted for
    Completed,
    /// The experiment was aborted before reaching its target
    Failed,
}

impl Default for ExperimentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl ExperimentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" | "complete" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Valid transitions from this status. Both terminal states absorb.
    pub fn valid_transitions(&self) -> Vec<ExperimentStatus> {
        match self {
            Self::Pending => vec![Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => vec![],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

/// Which phrase a trial exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// The current champion phrase
    A,
    /// The challenger phrase
    B,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// The result of a single trial, as reported to the aggregator.
///
/// A trial either produced a definitive reaction for one variant or it
/// failed before producing one. There is deliberately no way to express
/// "concluded with no variant and no failure": such a report would
/// silently lose a unit from the completion arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The scorer returned a reaction for the given variant.
    Scored {
        /// Which phrase was submitted
        variant: Variant,
        /// Whether the reaction was positive
        joy_sparked: bool,
    },
    /// The trial errored before producing a reaction.
    Failed,
}

/// What recording a trial outcome did to the experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentProgress {
    /// More trials are still outstanding.
    InFlight,
    /// The final outstanding trial was recorded and the experiment
    /// settled; approval rates are now set.
    Completed {
        /// Whether the challenger strictly beat the champion and should
        /// replace it.
        promote_challenger: bool,
    },
}

/// A bounded comparison of the champion phrase against a challenger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Unique identifier
    pub id: Uuid,
    /// Champion phrase at creation time
    pub variant_a: String,
    /// Challenger phrase under test
    pub variant_b: String,
    /// Trials that exercised variant A
    pub variant_a_runs: u32,
    /// Positive reactions for variant A
    pub variant_a_successes: u32,
    /// Trials that exercised variant B
    pub variant_b_runs: u32,
    /// Positive reactions for variant B
    pub variant_b_successes: u32,
    /// Trials that errored before producing a reaction
    pub failed_runs: u32,
    /// Total trials the experiment must observe
    pub target_runs: u32,
    /// Set on completion when variant A had at least one run
    pub variant_a_approval_rate: Option<f64>,
    /// Set on completion when variant B had at least one run
    pub variant_b_approval_rate: Option<f64>,
    /// Current status
    pub status: ExperimentStatus,
    /// When created
    pub created_at: DateTime<Utc>,
}

impl Experiment {
    /// Create a new pending experiment with zeroed counters.
    pub fn new(variant_a: impl Into<String>, variant_b: impl Into<String>, target_runs: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            variant_a: variant_a.into(),
            variant_b: variant_b.into(),
            variant_a_runs: 0,
            variant_a_successes: 0,
            variant_b_runs: 0,
            variant_b_successes: 0,
            failed_runs: 0,
            target_runs,
            variant_a_approval_rate: None,
            variant_b_approval_rate: None,
            status: ExperimentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Total trials accounted for so far, across both variants and failures.
    pub fn recorded_runs(&self) -> u32 {
        self.variant_a_runs + self.variant_b_runs + self.failed_runs
    }

    /// Check if the experiment is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The phrase text for a variant.
    pub fn phrase_for(&self, variant: Variant) -> &str {
        match variant {
            Variant::A => &self.variant_a,
            Variant::B => &self.variant_b,
        }
    }

    /// Transition to a new status, rejecting transitions the state
    /// machine does not allow.
    pub fn transition_to(&mut self, new_status: ExperimentStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(new_status) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not allowed".to_string(),
            });
        }
        self.status = new_status;
        Ok(())
    }

    /// Record one trial outcome against the correct counter and settle
    /// the experiment if this was the final outstanding run.
    ///
    /// Rejects outcomes for experiments that already settled; a caller
    /// seeing that error is delivering a stale or duplicate report.
    pub fn record(&mut self, outcome: TrialOutcome) -> DomainResult<ExperimentProgress> {
        if self.status != ExperimentStatus::Pending {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: self.status.as_str().to_string(),
                reason: "experiment already settled".to_string(),
            });
        }

        match outcome {
            TrialOutcome::Failed => self.failed_runs += 1,
            TrialOutcome::Scored { variant: Variant::A, joy_sparked } => {
                self.variant_a_runs += 1;
                if joy_sparked {
                    self.variant_a_successes += 1;
                }
            }
            TrialOutcome::Scored { variant: Variant::B, joy_sparked } => {
                self.variant_b_runs += 1;
                if joy_sparked {
                    self.variant_b_successes += 1;
                }
            }
        }

        if self.recorded_runs() < self.target_runs {
            return Ok(ExperimentProgress::InFlight);
        }

        // Final run accounted for: settle. A run count of zero leaves the
        // rate unset; an experiment can complete on failures alone.
        self.variant_a_approval_rate = approval_rate(self.variant_a_successes, self.variant_a_runs);
        self.variant_b_approval_rate = approval_rate(self.variant_b_successes, self.variant_b_runs);
        self.transition_to(ExperimentStatus::Completed)?;

        Ok(ExperimentProgress::Completed { promote_challenger: self.promotes_challenger() })
    }

    /// Whether the challenger strictly beat the champion.
    ///
    /// An unset rate on either side never promotes; neither does a tie.
    pub fn promotes_challenger(&self) -> bool {
        match (self.variant_a_approval_rate, self.variant_b_approval_rate) {
            (Some(rate_a), Some(rate_b)) => rate_b > rate_a,
            _ => false,
        }
    }
}

fn approval_rate(successes: u32, runs: u32) -> Option<f64> {
    if runs == 0 {
        return None;
    }
    Some(f64::from(successes) / f64::from(runs))
}

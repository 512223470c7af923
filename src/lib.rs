//! sparklab - Affirmation A/B Experimentation Service
//!
//! sparklab submits affirmation phrases to an external joy scorer,
//! receives reactions through a webhook, and aggregates trial outcomes
//! to decide whether a challenger phrase should replace the stored
//! champion.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): the experiment state machine, trial
//!   records, and the port traits
//! - **Service Layer** (`services`): experiment launching, trial
//!   dispatch, and outcome aggregation
//! - **Adapters** (`adapters`): SQLite persistence and the scorer client
//! - **Infrastructure** (`infrastructure`): configuration, logging, and
//!   the HTTP API
//! - **CLI Layer** (`cli`): command-line entry points

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AffirmationResult, ChampionPhrase, Config, Experiment, ExperimentProgress, ExperimentStatus,
    TrialOutcome, Variant,
};
pub use domain::ports::{AffirmationRepository, ChampionStore, ExperimentRepository, JoyScorer};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AffirmationService, ExperimentLauncher, ExperimentService, TrialDispatcher};

pub mod affirmation;
pub mod champion;
pub mod config;
pub mod experiment;

pub use affirmation::AffirmationResult;
pub use champion::ChampionPhrase;
pub use config::{Config, DatabaseConfig, LoggingConfig, ScorerConfig, ServerConfig};
pub use experiment::{Experiment, ExperimentProgress, ExperimentStatus, TrialOutcome, Variant};

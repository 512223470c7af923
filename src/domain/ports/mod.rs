//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `ExperimentRepository`: persistence for experiments (and the champion
//!   swap on settlement)
//! - `AffirmationRepository`: persistence for trial records
//! - `ChampionStore`: reads of the singleton champion phrase
//! - `JoyScorer`: the external boolean classifier
//!
//! These contracts keep the domain independent of SQLite and HTTP.

pub mod affirmation_repository;
pub mod champion_store;
pub mod experiment_repository;
pub mod scorer;

pub use affirmation_repository::AffirmationRepository;
pub use champion_store::ChampionStore;
pub use experiment_repository::ExperimentRepository;
pub use scorer::JoyScorer;

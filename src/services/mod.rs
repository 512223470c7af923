//! Service layer: experiment lifecycle, trial dispatch, and the trial log.

pub mod affirmation_service;
pub mod experiment_launcher;
pub mod experiment_service;
pub mod trial_dispatcher;

pub use affirmation_service::AffirmationService;
pub use experiment_launcher::ExperimentLauncher;
pub use experiment_service::ExperimentService;
pub use trial_dispatcher::TrialDispatcher;

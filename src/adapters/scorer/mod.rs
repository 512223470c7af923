//! Scorer adapters: the real spark endpoint client and a scripted mock.

pub mod mock;
pub mod spark_client;

pub use mock::{MockReaction, MockScorer};
pub use spark_client::SparkClient;

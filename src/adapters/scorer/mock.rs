//! Mock scorer for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::JoyScorer;

/// One scripted reaction.
#[derive(Debug, Clone)]
pub enum MockReaction {
    /// Return this signal
    Joy(bool),
    /// Fail the trial with this message
    Fail(String),
}

/// Scorer that replays a scripted sequence of reactions.
///
/// Once the script is exhausted, every further call returns the fallback
/// reaction. Calls are counted so tests can assert how many trials
/// reached the scorer.
pub struct MockScorer {
    script: Mutex<VecDeque<MockReaction>>,
    fallback: MockReaction,
    calls: AtomicUsize,
}

impl MockScorer {
    /// Scorer that always returns the given signal.
    pub fn always(joy_sparked: bool) -> Self {
        Self::scripted([], MockReaction::Joy(joy_sparked))
    }

    /// Scorer that always fails the trial.
    pub fn always_failing() -> Self {
        Self::scripted([], MockReaction::Fail("mock scorer failure".to_string()))
    }

    /// Scorer that replays the script, then repeats `fallback`.
    pub fn scripted(reactions: impl IntoIterator<Item = MockReaction>, fallback: MockReaction) -> Self {
        Self {
            script: Mutex::new(reactions.into_iter().collect()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `score` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JoyScorer for MockScorer {
    async fn score(&self, _phrase: &str) -> DomainResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reaction = self.script.lock().await.pop_front().unwrap_or_else(|| self.fallback.clone());
        match reaction {
            MockReaction::Joy(joy_sparked) => Ok(joy_sparked),
            MockReaction::Fail(message) => Err(DomainError::TrialFailed(message)),
        }
    }
}

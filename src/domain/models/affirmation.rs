//! Affirmation trial record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One submission of a phrase to the scorer.
///
/// Created when the trial starts with the reaction unset; the reaction is
/// recorded exactly once when the webhook callback arrives. Later
/// callbacks for the same record are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffirmationResult {
    /// Unique identifier, carried through the webhook callback
    pub id: Uuid,
    /// The phrase that was shared
    pub text: String,
    /// The reaction, unset until the callback arrives
    pub joy_sparked: Option<bool>,
    /// When the trial started
    pub created_at: DateTime<Utc>,
    /// When the callback arrived
    pub callback_received_at: Option<DateTime<Utc>>,
}

impl AffirmationResult {
    /// Create a new record with the reaction unset.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            joy_sparked: None,
            created_at: Utc::now(),
            callback_received_at: None,
        }
    }

    /// Whether a reaction has already been recorded.
    pub fn reaction_recorded(&self) -> bool {
        self.callback_received_at.is_some()
    }
}

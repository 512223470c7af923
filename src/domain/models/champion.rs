//! Champion phrase model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The currently favored phrase, served by default and used as variant A
/// in every experiment. A process-wide singleton, replaced only when a
/// challenger strictly beats it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionPhrase {
    /// The phrase text
    pub phrase: String,
    /// When the phrase last changed
    pub updated_at: DateTime<Utc>,
}

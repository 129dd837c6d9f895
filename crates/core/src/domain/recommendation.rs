use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked session suggestion, with the plain-language reasons that
/// earned its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub session_id: String,
    pub score: u8,
    pub reasons: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::rewards::Reward;

/// One completion attempt that was accepted. At most one exists per
/// (user, date, activity); later attempts are rejected rather than
/// re-rewarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub id: String,
    pub user_id: String,
    pub assigned_on: NaiveDate,
    pub activity_id: String,
    pub engagement_secs: u32,
    pub reflection_chars: u32,
    pub mood: i32,
    pub qualifies: bool,
    pub reward: Reward,
    pub completed_at: DateTime<Utc>,
}

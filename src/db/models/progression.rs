use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{Archetype, Tier};

/// Per-user progression record: reward currency totals and streak state,
/// plus last-observed tier/archetype snapshots and the enrollment date the
/// eligibility filter derives "days since start" from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgression {
    pub user_id: String,
    pub total_xp: u64,
    pub total_tokens: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_on: Option<NaiveDate>,
    pub tier: Tier,
    pub archetype: Archetype,
    pub enrolled_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

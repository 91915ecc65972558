use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The activity (or activities) selected for a user on a calendar date.
///
/// Immutable once created, except that a reroll may replace the primary
/// activity and set `reroll_used`, exactly once. There is no explicit
/// expiry: an assignment simply becomes historical when the date rolls
/// over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyAssignment {
    pub user_id: String,
    pub assigned_on: NaiveDate,
    pub activity_id: String,
    pub bonus_activity_id: Option<String>,
    pub reroll_used: bool,
    pub created_at: DateTime<Utc>,
}

impl DailyAssignment {
    pub fn includes(&self, activity_id: &str) -> bool {
        self.activity_id == activity_id
            || self
                .bonus_activity_id
                .as_deref()
                .map_or(false, |bonus| bonus == activity_id)
    }

    pub fn activity_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.activity_id.as_str()];
        if let Some(bonus) = self.bonus_activity_id.as_deref() {
            ids.push(bonus);
        }
        ids
    }
}

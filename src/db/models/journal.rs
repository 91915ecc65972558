use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum JournalSource {
    Typed,
    Dictated,
}

impl JournalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalSource::Typed => "typed",
            JournalSource::Dictated => "dictated",
        }
    }
}

/// A reflective journal entry tied to an assignment. Independent of the
/// quality gate: a user may journal without earning rewards. One entry per
/// (user, date, activity); a later save overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub assigned_on: NaiveDate,
    pub activity_id: String,
    pub reflection: String,
    pub mood: i32,
    pub tags: Vec<String>,
    pub source: JournalSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

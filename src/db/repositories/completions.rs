use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{params, Row, Transaction};

use crate::db::{
    connection::Database,
    helpers::{date_to_sql, parse_date, parse_datetime, parse_optional_date, to_u32},
    models::{CompletionRecord, JournalEntry},
};
use crate::rewards::Reward;
use crate::streak::StreakState;

/// Result of the transactional completion write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionWriteOutcome {
    /// A completion for this (user, date, activity) already existed;
    /// nothing was written.
    AlreadyCompleted,
    Recorded {
        first_of_day: bool,
        current_streak: u32,
    },
}

fn row_to_completion(row: &Row) -> Result<CompletionRecord> {
    let assigned_on: String = row.get("assigned_on")?;
    let completed_at: String = row.get("completed_at")?;
    let engagement_secs: i64 = row.get("engagement_secs")?;
    let reflection_chars: i64 = row.get("reflection_chars")?;
    let qualifies: i64 = row.get("qualifies")?;
    let reward_xp: i64 = row.get("reward_xp")?;
    let reward_tokens: i64 = row.get("reward_tokens")?;

    Ok(CompletionRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        assigned_on: parse_date(&assigned_on, "assigned_on")?,
        activity_id: row.get("activity_id")?,
        engagement_secs: to_u32(engagement_secs, "engagement_secs")?,
        reflection_chars: to_u32(reflection_chars, "reflection_chars")?,
        mood: row.get("mood")?,
        qualifies: qualifies != 0,
        reward: Reward {
            xp: to_u32(reward_xp, "reward_xp")?,
            tokens: to_u32(reward_tokens, "reward_tokens")?,
        },
        completed_at: parse_datetime(&completed_at, "completed_at")?,
    })
}

fn read_streak_for_update(tx: &Transaction<'_>, user_id: &str) -> Result<StreakState> {
    let mut stmt = tx.prepare(
        "SELECT current_streak, longest_streak, last_completed_on
         FROM user_progression
         WHERE user_id = ?1",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let row = rows
        .next()?
        .ok_or_else(|| anyhow!("progression row missing for user {user_id}"))?;

    let current: i64 = row.get("current_streak")?;
    let longest: i64 = row.get("longest_streak")?;
    let last: Option<String> = row.get("last_completed_on")?;

    Ok(StreakState {
        current: to_u32(current, "current_streak")?,
        longest: to_u32(longest, "longest_streak")?,
        last_completed_on: parse_optional_date(last, "last_completed_on")?,
    })
}

impl Database {
    /// The completion write: one transaction covering the completion
    /// record, the currency increment, the once-per-day streak update and
    /// the journal upsert. A failure anywhere leaves no partial state:
    /// an assignment is never half-completed and a reward never
    /// half-granted.
    pub async fn record_completion(
        &self,
        record: CompletionRecord,
        journal: JournalEntry,
    ) -> Result<CompletionWriteOutcome> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let inserted = tx.execute(
                "INSERT INTO completions
                     (id, user_id, assigned_on, activity_id, engagement_secs, reflection_chars,
                      mood, qualifies, reward_xp, reward_tokens, completed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(user_id, assigned_on, activity_id) DO NOTHING",
                params![
                    record.id,
                    record.user_id,
                    date_to_sql(record.assigned_on),
                    record.activity_id,
                    record.engagement_secs as i64,
                    record.reflection_chars as i64,
                    record.mood,
                    record.qualifies as i64,
                    record.reward.xp as i64,
                    record.reward.tokens as i64,
                    record.completed_at.to_rfc3339(),
                ],
            )?;
            if inserted == 0 {
                return Ok(CompletionWriteOutcome::AlreadyCompleted);
            }

            // Streak credit is per-day, not per-activity: only the first
            // completion of the day advances it.
            let earlier_today: i64 = tx.query_row(
                "SELECT COUNT(*) FROM completions
                 WHERE user_id = ?1 AND assigned_on = ?2 AND id != ?3",
                params![record.user_id, date_to_sql(record.assigned_on), record.id],
                |row| row.get(0),
            )?;
            let first_of_day = earlier_today == 0;

            let before = read_streak_for_update(&tx, &record.user_id)?;
            let after = if first_of_day {
                before.advance(record.assigned_on)
            } else {
                before
            };

            tx.execute(
                "UPDATE user_progression
                 SET total_xp = total_xp + ?1,
                     total_tokens = total_tokens + ?2,
                     current_streak = ?3,
                     longest_streak = ?4,
                     last_completed_on = ?5,
                     updated_at = ?6
                 WHERE user_id = ?7",
                params![
                    record.reward.xp as i64,
                    record.reward.tokens as i64,
                    after.current as i64,
                    after.longest as i64,
                    after.last_completed_on.map(date_to_sql),
                    record.completed_at.to_rfc3339(),
                    record.user_id,
                ],
            )?;

            // The conflict update leaves tags alone; the completion path
            // carries none and must not clobber tags saved through the
            // journaling flow.
            let tags_json = serde_json::to_string(&journal.tags)?;
            tx.execute(
                "INSERT INTO journal_entries
                     (id, user_id, assigned_on, activity_id, reflection, mood, tags, source,
                      created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(user_id, assigned_on, activity_id) DO UPDATE SET
                     reflection = excluded.reflection,
                     mood = excluded.mood,
                     source = excluded.source,
                     updated_at = excluded.updated_at",
                params![
                    journal.id,
                    journal.user_id,
                    date_to_sql(journal.assigned_on),
                    journal.activity_id,
                    journal.reflection,
                    journal.mood,
                    tags_json,
                    journal.source.as_str(),
                    journal.created_at.to_rfc3339(),
                    journal.updated_at.to_rfc3339(),
                ],
            )?;

            tx.commit()?;
            Ok(CompletionWriteOutcome::Recorded {
                first_of_day,
                current_streak: after.current,
            })
        })
        .await
    }

    pub async fn completions_for_day(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<CompletionRecord>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, assigned_on, activity_id, engagement_secs, reflection_chars,
                        mood, qualifies, reward_xp, reward_tokens, completed_at
                 FROM completions
                 WHERE user_id = ?1 AND assigned_on = ?2
                 ORDER BY completed_at ASC",
            )?;

            let mut rows = stmt.query(params![user_id, date_to_sql(date)])?;
            let mut completions = Vec::new();
            while let Some(row) = rows.next()? {
                completions.push(row_to_completion(row)?);
            }

            Ok(completions)
        })
        .await
    }
}

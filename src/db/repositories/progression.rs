use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{
        date_to_sql, parse_archetype, parse_date, parse_datetime, parse_optional_date, parse_tier,
        to_u32, to_u64,
    },
    models::UserProgression,
};
use crate::profile::{Archetype, Tier};

fn row_to_progression(row: &Row) -> Result<UserProgression> {
    let total_xp: i64 = row.get("total_xp")?;
    let total_tokens: i64 = row.get("total_tokens")?;
    let current_streak: i64 = row.get("current_streak")?;
    let longest_streak: i64 = row.get("longest_streak")?;
    let last_completed_on: Option<String> = row.get("last_completed_on")?;
    let tier: String = row.get("tier")?;
    let archetype: String = row.get("archetype")?;
    let enrolled_on: String = row.get("enrolled_on")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(UserProgression {
        user_id: row.get("user_id")?,
        total_xp: to_u64(total_xp, "total_xp")?,
        total_tokens: to_u64(total_tokens, "total_tokens")?,
        current_streak: to_u32(current_streak, "current_streak")?,
        longest_streak: to_u32(longest_streak, "longest_streak")?,
        last_completed_on: parse_optional_date(last_completed_on, "last_completed_on")?,
        tier: parse_tier(&tier)?,
        archetype: parse_archetype(&archetype)?,
        enrolled_on: parse_date(&enrolled_on, "enrolled_on")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    /// Create the progression row on first contact, or refresh the
    /// tier/archetype snapshot on every later call. Currency and streak
    /// columns are never touched here; those only move inside the
    /// completion transaction.
    pub async fn ensure_progression(
        &self,
        user_id: &str,
        tier: Tier,
        archetype: Archetype,
        enrolled_on: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO user_progression
                     (user_id, total_xp, total_tokens, current_streak, longest_streak,
                      last_completed_on, tier, archetype, enrolled_on, created_at, updated_at)
                 VALUES (?1, 0, 0, 0, 0, NULL, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                     tier = excluded.tier,
                     archetype = excluded.archetype,
                     updated_at = excluded.updated_at",
                params![
                    user_id,
                    tier.as_str(),
                    archetype.as_str(),
                    date_to_sql(enrolled_on),
                    now.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_progression(&self, user_id: &str) -> Result<Option<UserProgression>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, total_xp, total_tokens, current_streak, longest_streak,
                        last_completed_on, tier, archetype, enrolled_on, created_at, updated_at
                 FROM user_progression
                 WHERE user_id = ?1",
            )?;

            let mut rows = stmt.query(params![user_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_progression(row)?)),
                None => Ok(None),
            }
        })
        .await
    }
}

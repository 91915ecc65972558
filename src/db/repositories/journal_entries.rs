use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{date_to_sql, parse_date, parse_datetime, parse_journal_source},
    models::JournalEntry,
};

fn row_to_journal_entry(row: &Row) -> Result<JournalEntry> {
    let assigned_on: String = row.get("assigned_on")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let tags_json: String = row.get("tags")?;
    let source: String = row.get("source")?;

    Ok(JournalEntry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        assigned_on: parse_date(&assigned_on, "assigned_on")?,
        activity_id: row.get("activity_id")?,
        reflection: row.get("reflection")?,
        mood: row.get("mood")?,
        tags: serde_json::from_str(&tags_json).context("failed to parse journal tags")?,
        source: parse_journal_source(&source)?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    /// Insert or overwrite the entry for (user, day, activity). The UI
    /// allows editing before final save, so a later submission replaces
    /// the stored text rather than appending. The original row id and
    /// created_at survive an overwrite.
    pub async fn upsert_journal_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
        self.execute(move |conn| {
            let tags_json = serde_json::to_string(&entry.tags)?;
            conn.execute(
                "INSERT INTO journal_entries
                     (id, user_id, assigned_on, activity_id, reflection, mood, tags, source,
                      created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(user_id, assigned_on, activity_id) DO UPDATE SET
                     reflection = excluded.reflection,
                     mood = excluded.mood,
                     tags = excluded.tags,
                     source = excluded.source,
                     updated_at = excluded.updated_at",
                params![
                    entry.id,
                    entry.user_id,
                    date_to_sql(entry.assigned_on),
                    entry.activity_id,
                    entry.reflection,
                    entry.mood,
                    tags_json,
                    entry.source.as_str(),
                    entry.created_at.to_rfc3339(),
                    entry.updated_at.to_rfc3339(),
                ],
            )?;

            let mut stmt = conn.prepare(
                "SELECT id, user_id, assigned_on, activity_id, reflection, mood, tags, source,
                        created_at, updated_at
                 FROM journal_entries
                 WHERE user_id = ?1 AND assigned_on = ?2 AND activity_id = ?3",
            )?;
            let mut rows = stmt.query(params![
                entry.user_id,
                date_to_sql(entry.assigned_on),
                entry.activity_id
            ])?;
            let row = rows
                .next()?
                .context("journal entry missing immediately after upsert")?;

            row_to_journal_entry(row)
        })
        .await
    }

    pub async fn get_journal_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
        activity_id: &str,
    ) -> Result<Option<JournalEntry>> {
        let user_id = user_id.to_string();
        let activity_id = activity_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, assigned_on, activity_id, reflection, mood, tags, source,
                        created_at, updated_at
                 FROM journal_entries
                 WHERE user_id = ?1 AND assigned_on = ?2 AND activity_id = ?3",
            )?;

            let mut rows = stmt.query(params![user_id, date_to_sql(date), activity_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_journal_entry(row)?)),
                None => Ok(None),
            }
        })
        .await
    }
}

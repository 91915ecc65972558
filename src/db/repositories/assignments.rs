use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{date_to_sql, parse_date, parse_datetime},
    models::DailyAssignment,
};

fn row_to_assignment(row: &Row) -> Result<DailyAssignment> {
    let assigned_on: String = row.get("assigned_on")?;
    let created_at: String = row.get("created_at")?;
    let reroll_used: i64 = row.get("reroll_used")?;

    Ok(DailyAssignment {
        user_id: row.get("user_id")?,
        assigned_on: parse_date(&assigned_on, "assigned_on")?,
        activity_id: row.get("activity_id")?,
        bonus_activity_id: row.get("bonus_activity_id")?,
        reroll_used: reroll_used != 0,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Conditional insert keyed on (user, day). Returns true when this
    /// call created the row; false means a concurrent caller won the race
    /// and the stored assignment should be read back.
    pub async fn insert_assignment_if_absent(
        &self,
        assignment: &DailyAssignment,
    ) -> Result<bool> {
        let record = assignment.clone();
        self.execute(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO daily_assignments
                     (user_id, assigned_on, activity_id, bonus_activity_id, reroll_used, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id, assigned_on) DO NOTHING",
                params![
                    record.user_id,
                    date_to_sql(record.assigned_on),
                    record.activity_id,
                    record.bonus_activity_id,
                    record.reroll_used as i64,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
    }

    pub async fn get_assignment(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyAssignment>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, assigned_on, activity_id, bonus_activity_id, reroll_used, created_at
                 FROM daily_assignments
                 WHERE user_id = ?1 AND assigned_on = ?2",
            )?;

            let mut rows = stmt.query(params![user_id, date_to_sql(date)])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_assignment(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Spend the single daily reroll: swaps the primary activity and flips
    /// the flag in one conditional statement. Returns false when the
    /// reroll was already used, including when a concurrent attempt got
    /// there first.
    pub async fn apply_reroll(
        &self,
        user_id: &str,
        date: NaiveDate,
        new_activity_id: &str,
    ) -> Result<bool> {
        let user_id = user_id.to_string();
        let new_activity_id = new_activity_id.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE daily_assignments
                 SET activity_id = ?1,
                     reroll_used = 1
                 WHERE user_id = ?2 AND assigned_on = ?3 AND reroll_used = 0",
                params![new_activity_id, user_id, date_to_sql(date)],
            )?;
            Ok(updated == 1)
        })
        .await
    }
}

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use super::{from_json_column, to_json_column};
use crate::models::{Upserted, WeeklyDay, WeeklySummary, LAST_7_DAYS};

pub fn find_weekly(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<WeeklySummary>> {
    conn.query_row(
        "SELECT id, user_id, summary_type, days_json, created_at, updated_at
         FROM weekly_data
         WHERE user_id = ? AND summary_type = ?",
        params![user_id, LAST_7_DAYS],
        |row| {
            let days_json: String = row.get(3)?;
            Ok(WeeklySummary {
                id: row.get(0)?,
                user_id: row.get(1)?,
                kind: row.get(2)?,
                days: from_json_column(3, &days_json)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
            })
        },
    )
    .optional()
}

pub fn upsert_weekly(
    conn: &Connection,
    user_id: &str,
    days: &[WeeklyDay],
    now: NaiveDateTime,
) -> rusqlite::Result<Upserted> {
    let days_json = to_json_column(days)?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM weekly_data WHERE user_id = ? AND summary_type = ?",
            params![user_id, LAST_7_DAYS],
            |row| row.get(0),
        )
        .optional()?;

    let outcome = match existing {
        Some(id) => {
            tx.execute(
                "UPDATE weekly_data SET days_json = ?, updated_at = ? WHERE id = ?",
                params![days_json, now, id],
            )?;
            debug!(weekly_id = %id, user_id = %user_id, "Updated weekly summary");
            Upserted { id, created: false }
        }
        None => {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO weekly_data (id, user_id, summary_type, days_json, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![id, user_id, LAST_7_DAYS, days_json, now, now],
            )?;
            debug!(weekly_id = %id, user_id = %user_id, "Created weekly summary");
            Upserted { id, created: true }
        }
    };

    tx.commit()?;
    Ok(outcome)
}

pub fn delete_weekly(conn: &Connection, user_id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM weekly_data WHERE user_id = ? AND summary_type = ?",
        params![user_id, LAST_7_DAYS],
    )?;
    if rows > 0 {
        debug!(user_id = %user_id, "Deleted weekly summary");
    }
    Ok(rows > 0)
}

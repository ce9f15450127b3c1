use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use super::{from_json_column, to_json_column};
use crate::models::{MonthlyRow, MonthlySummary, Upserted};

pub fn find_monthly(
    conn: &Connection,
    user_id: &str,
    month: &str,
) -> rusqlite::Result<Option<MonthlySummary>> {
    conn.query_row(
        "SELECT id, user_id, month, rows_json, created_at, updated_at
         FROM monthly_data
         WHERE user_id = ? AND month = ?",
        params![user_id, month],
        |row| {
            let rows_json: String = row.get(3)?;
            Ok(MonthlySummary {
                id: row.get(0)?,
                user_id: row.get(1)?,
                month: row.get(2)?,
                rows: from_json_column(3, &rows_json)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
            })
        },
    )
    .optional()
}

/// Replaces the rows of the `(user_id, month)` summary, creating it if absent.
///
/// An existing summary keeps its id and `created_at`; only `rows` and
/// `updated_at` change.
pub fn upsert_monthly(
    conn: &Connection,
    user_id: &str,
    month: &str,
    rows: &[MonthlyRow],
    now: NaiveDateTime,
) -> rusqlite::Result<Upserted> {
    let rows_json = to_json_column(rows)?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM monthly_data WHERE user_id = ? AND month = ?",
            params![user_id, month],
            |row| row.get(0),
        )
        .optional()?;

    let outcome = match existing {
        Some(id) => {
            tx.execute(
                "UPDATE monthly_data SET rows_json = ?, updated_at = ? WHERE id = ?",
                params![rows_json, now, id],
            )?;
            debug!(monthly_id = %id, user_id = %user_id, month = %month, "Updated monthly summary");
            Upserted { id, created: false }
        }
        None => {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO monthly_data (id, user_id, month, rows_json, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![id, user_id, month, rows_json, now, now],
            )?;
            debug!(monthly_id = %id, user_id = %user_id, month = %month, "Created monthly summary");
            Upserted { id, created: true }
        }
    };

    tx.commit()?;
    Ok(outcome)
}

pub fn delete_monthly(conn: &Connection, user_id: &str, month: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM monthly_data WHERE user_id = ? AND month = ?",
        params![user_id, month],
    )?;
    if rows > 0 {
        debug!(user_id = %user_id, month = %month, "Deleted monthly summary");
    }
    Ok(rows > 0)
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::display_timestamp;

/// Natural-key discriminator of the trailing-week summary.
pub const LAST_7_DAYS: &str = "last7days";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDay {
    pub date: String,
    pub spent: f64,
}

/// Stored spend per day over the trailing week, one per `(user_id, "last7days")`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    #[serde(rename = "weekly_id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub days: Vec<WeeklyDay>,
    #[serde(serialize_with = "display_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "display_timestamp")]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyWritten {
    pub message: String,
    pub weekly_id: String,
}

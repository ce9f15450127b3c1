use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::display_timestamp;

/// Spend of one category against its budget for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub category_id: String,
    pub category_name: String,
    pub budget: f64,
    pub spent: f64,
}

/// Stored monthly analytics for a user, one per `(user_id, month)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    #[serde(rename = "monthly_id")]
    pub id: String,
    pub user_id: String,
    pub month: String,
    pub rows: Vec<MonthlyRow>,
    #[serde(serialize_with = "display_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "display_timestamp")]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyGenerateRequest {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyWritten {
    pub message: String,
    pub monthly_id: String,
}

pub mod budget;
pub mod category;
pub mod monthly;
pub mod weekly;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::date_utils::format_display;

pub use budget::Budget;
pub use category::{Category, Item};
pub use monthly::{MonthlyGenerateRequest, MonthlyRow, MonthlySummary, MonthlyWritten};
pub use weekly::{WeeklyDay, WeeklySummary, WeeklyWritten, LAST_7_DAYS};

/// Response body of operations that only report what happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a natural-key upsert: the document id and whether it was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub id: String,
    pub created: bool,
}

pub(crate) fn display_timestamp<S>(instant: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_display(instant))
}

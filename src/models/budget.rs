use serde::{Deserialize, Serialize};

use super::category::{id_as_string, lenient_number};

/// Spending limit of one category for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default, deserialize_with = "id_as_string")]
    pub category_id: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub limit: Option<f64>,
}

impl Budget {
    pub fn limit(&self) -> f64 {
        self.limit.unwrap_or(0.0)
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A spending category as returned by the budgeting service, with the
/// purchases recorded against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "id_as_string")]
    pub category_id: String,
    #[serde(default = "unknown_name", deserialize_with = "name_or_unknown")]
    pub name: String,
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<Item>,
}

/// A single purchase inside a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_number")]
    pub item_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub item_quantity: Option<i64>,
    /// Raw ISO-8601 string. Anything that is not a string is kept as `None`
    /// and treated like an unparsable timestamp.
    #[serde(default, deserialize_with = "string_or_none")]
    pub created_at: Option<String>,
}

impl Item {
    pub fn price(&self) -> f64 {
        self.item_price.unwrap_or(0.0)
    }

    pub fn quantity(&self) -> i64 {
        self.item_quantity.unwrap_or(1)
    }

    pub fn amount(&self) -> f64 {
        self.price() * self.quantity() as f64
    }
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// Category ids arrive as strings or numbers; both compare as their string form.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn name_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => unknown_name(),
        other => other.to_string(),
    })
}

fn items_or_empty<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Item>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

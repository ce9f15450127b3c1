pub mod monthly;
pub mod weekly;

use rusqlite::types::Type;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Summary rows and days are stored as JSON text columns.
fn to_json_column<T: Serialize + ?Sized>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn from_json_column<T: DeserializeOwned>(idx: usize, text: &str) -> rusqlite::Result<T> {
    serde_json::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

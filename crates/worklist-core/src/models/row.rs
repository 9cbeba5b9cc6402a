//! Row objects produced by the spreadsheet ingestion boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One spreadsheet row as an ordered-key mapping.
///
/// Key order matters: the schema reconciler discards every column from
/// "Visit Sts" onward in first-row key order. Absent cells default to the
/// empty string at the ingestion boundary, so lookups here never invent
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RowObject {
    cells: Map<String, Value>,
}

impl RowObject {
    pub fn new() -> Self {
        Self { cells: Map::new() }
    }

    /// Insert a cell, keeping insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    /// Column names in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell value coerced to display text. Missing cells, nulls, and empty
    /// strings all come back empty.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(cell_text).unwrap_or_default()
    }
}

impl FromIterator<(String, Value)> for RowObject {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Coerce a raw cell value to display text.
///
/// Numbers render without a trailing `.0` when integral, matching how the
/// source spreadsheets show them.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else {
                n.to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

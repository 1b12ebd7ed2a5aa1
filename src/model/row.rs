//! Row representation returned by query execution

use std::collections::HashMap;

use serde_json::Value;

/// A single result row: column name to dynamically-typed value
///
/// Backends decode driver-specific rows into this shape so the relation
/// engine never depends on a concrete database driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlRow {
    values: HashMap<String, Value>,
}

impl SqlRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column value, replacing any previous value for that name
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Builder-style insert, convenient for tests and backends
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.set(column, value);
        self
    }

    /// Value for a column; `None` when the column was not selected
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Iterate over all column/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for SqlRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

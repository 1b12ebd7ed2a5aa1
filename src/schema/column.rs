//! Column descriptors - per-field metadata for a mapped entity

use serde::{Deserialize, Serialize};

/// Metadata for a single declared column
///
/// `name` is the logical field name used in queries against the entity;
/// `storage` is the underlying column name in the database (the adapter
/// key), which differs from `name` when the column is aliased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Logical field name
    pub name: String,

    /// Storage column name; `None` means same as `name`
    pub storage: Option<String>,

    /// Whether this column is the entity's primary key
    pub primary: bool,
}

impl ColumnDef {
    /// Create a column with default storage name and no primary flag
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: None,
            primary: false,
        }
    }

    /// Mark this column as the primary key
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Map the logical name onto a different storage column
    pub fn stored_as(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    /// The storage column name (adapter key) for this column
    pub fn adapter_key(&self) -> &str {
        self.storage.as_deref().unwrap_or(&self.name)
    }
}

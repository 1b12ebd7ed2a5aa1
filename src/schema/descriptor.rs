//! Entity descriptors - static metadata for a mapped type
//!
//! A descriptor is built once at registration time and read-only
//! thereafter. The relation engine only ever consumes descriptors; it
//! never introspects live database schema.

use serde::{Deserialize, Serialize};

use super::column::ColumnDef;

/// Static metadata for a mapped entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Type identifier, e.g. `"User"`
    pub entity: String,

    /// Table name, e.g. `"users"`
    pub table: String,

    /// Declared columns, in declaration order
    pub columns: Vec<ColumnDef>,
}

impl EntityDescriptor {
    /// Create a descriptor with no columns
    pub fn new(entity: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column definition
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Look up a column by logical name
    pub fn find_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a logical column name is declared on this entity
    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    /// The column marked primary, if any
    pub fn primary_column(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary)
    }
}

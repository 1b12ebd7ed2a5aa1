//! Relation options - the enumerated overrides a declaration may carry

use serde::{Deserialize, Serialize};

/// Explicit overrides for a many-to-many declaration
///
/// Every field is optional; anything left unset falls back to naming
/// conventions at boot time. Each override is independent; setting
/// `local_key` does not shift the `pivot_foreign_key` derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManyToManyOptions {
    /// Column on the owning entity used to match parent rows
    pub local_key: Option<String>,

    /// Column on the related entity matched against the pivot table
    pub related_key: Option<String>,

    /// Junction table name
    pub pivot_table: Option<String>,

    /// Pivot column referencing the owning entity
    pub pivot_foreign_key: Option<String>,

    /// Pivot column referencing the related entity
    pub pivot_related_foreign_key: Option<String>,

    /// Additional pivot columns to project, each aliased `pivot_<name>`
    pub pivot_columns: Vec<String>,
}

impl ManyToManyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_key(mut self, key: impl Into<String>) -> Self {
        self.local_key = Some(key.into());
        self
    }

    pub fn related_key(mut self, key: impl Into<String>) -> Self {
        self.related_key = Some(key.into());
        self
    }

    pub fn pivot_table(mut self, table: impl Into<String>) -> Self {
        self.pivot_table = Some(table.into());
        self
    }

    pub fn pivot_foreign_key(mut self, key: impl Into<String>) -> Self {
        self.pivot_foreign_key = Some(key.into());
        self
    }

    pub fn pivot_related_foreign_key(mut self, key: impl Into<String>) -> Self {
        self.pivot_related_foreign_key = Some(key.into());
        self
    }

    pub fn pivot_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pivot_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

//! Query builder SELECT and FROM operations

use super::builder::QueryBuilder;
use super::types::OrderDirection;

impl<M> QueryBuilder<M> {
    /// Add SELECT fields; a comma-separated list is split into columns
    pub fn select(mut self, fields: &str) -> Self {
        if fields == "*" {
            self.select_fields.push("*".to_string());
        } else {
            self.select_fields
                .extend(fields.split(',').map(|f| f.trim().to_string()));
        }
        self
    }

    /// Add a single raw SELECT expression, e.g. an aliased column
    pub fn select_raw(mut self, expression: impl Into<String>) -> Self {
        self.select_fields.push(expression.into());
        self
    }

    /// Set the FROM table
    pub fn from(mut self, table: &str) -> Self {
        self.from_table = Some(table.to_string());
        self
    }

    /// Add an ascending ORDER BY
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Asc));
        self
    }

    /// Add a descending ORDER BY
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Desc));
        self
    }

    /// Set the LIMIT
    pub fn limit(mut self, count: i64) -> Self {
        self.limit_count = Some(count);
        self
    }
}

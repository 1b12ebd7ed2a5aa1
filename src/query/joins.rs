//! Query builder JOIN operations

use super::builder::QueryBuilder;
use super::types::{JoinClause, JoinType};

impl<M> QueryBuilder<M> {
    /// Add an INNER JOIN: `INNER JOIN table ON left_col = right_col`
    pub fn join(mut self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.joins.push(JoinClause {
            join_type: JoinType::Inner,
            table: table.to_string(),
            left_column: left_col.to_string(),
            right_column: right_col.to_string(),
        });
        self
    }

    /// Add a LEFT JOIN
    pub fn left_join(mut self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.joins.push(JoinClause {
            join_type: JoinType::Left,
            table: table.to_string(),
            left_column: left_col.to_string(),
            right_column: right_col.to_string(),
        });
        self
    }
}

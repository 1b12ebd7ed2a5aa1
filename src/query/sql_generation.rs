//! Query builder SQL generation
//!
//! Emits Postgres-style `$n` placeholders; bound values travel alongside
//! the SQL so nothing is ever interpolated into the statement text.

use serde_json::Value;

use super::builder::QueryBuilder;
use super::types::QueryOperator;

impl<M> QueryBuilder<M> {
    /// Generate the SELECT statement plus its ordered bind parameters
    pub fn to_sql_with_params(&self) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut param_counter = 1usize;

        sql.push_str("SELECT ");
        if self.select_fields.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_fields.join(", "));
        }

        if let Some(table) = &self.from_table {
            sql.push_str(" FROM ");
            sql.push_str(table);
        }

        for join in &self.joins {
            sql.push_str(&format!(
                " {} {} ON {} = {}",
                join.join_type, join.table, join.left_column, join.right_column
            ));
        }

        if !self.where_conditions.is_empty() {
            sql.push_str(" WHERE ");
            for (i, condition) in self.where_conditions.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push_str(&condition.column);
                match condition.operator {
                    QueryOperator::In => {
                        sql.push_str(" IN (");
                        for (j, value) in condition.values.iter().enumerate() {
                            if j > 0 {
                                sql.push_str(", ");
                            }
                            sql.push_str(&format!("${}", param_counter));
                            params.push(value.clone());
                            param_counter += 1;
                        }
                        sql.push(')');
                    }
                    QueryOperator::IsNull => {
                        sql.push_str(" IS NULL");
                    }
                    _ => {
                        sql.push_str(&format!(" {} ${}", condition.operator, param_counter));
                        if let Some(value) = &condition.value {
                            params.push(value.clone());
                        }
                        param_counter += 1;
                    }
                }
            }
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let clauses: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction))
                .collect();
            sql.push_str(&clauses.join(", "));
        }

        if let Some(limit) = self.limit_count {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, params)
    }

    /// The statement text alone
    pub fn to_sql(&self) -> String {
        self.to_sql_with_params().0
    }
}

//! Query builder - core SELECT builder

use std::marker::PhantomData;

use super::types::*;

/// Builder for SELECT queries against a single table plus joins
///
/// The type parameter ties a query to the entity it hydrates into;
/// `QueryBuilder<()>` works for untyped row access.
#[derive(Debug)]
pub struct QueryBuilder<M = ()> {
    pub(crate) select_fields: Vec<String>,
    pub(crate) from_table: Option<String>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: Option<i64>,
    _phantom: PhantomData<M>,
}

impl<M> Clone for QueryBuilder<M> {
    fn clone(&self) -> Self {
        Self {
            select_fields: self.select_fields.clone(),
            from_table: self.from_table.clone(),
            joins: self.joins.clone(),
            where_conditions: self.where_conditions.clone(),
            order_by: self.order_by.clone(),
            limit_count: self.limit_count,
            _phantom: PhantomData,
        }
    }
}

impl<M> Default for QueryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> QueryBuilder<M> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            select_fields: Vec::new(),
            from_table: None,
            joins: Vec::new(),
            where_conditions: Vec::new(),
            order_by: Vec::new(),
            limit_count: None,
            _phantom: PhantomData,
        }
    }
}

//! Query execution - object-safe client trait and hydration helpers

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use crate::error::OrmResult;
use crate::model::{Entity, SqlRow};

use super::builder::QueryBuilder;

/// Asynchronous query execution seam
///
/// The relation engine issues all I/O through this trait; backends
/// (and test fakes) decide how statements actually run.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Execute a statement and return all result rows
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<SqlRow>>;
}

impl<M> QueryBuilder<M> {
    /// Execute this query and return raw rows
    pub async fn fetch_rows(&self, client: &dyn QueryClient) -> OrmResult<Vec<SqlRow>> {
        let (sql, params) = self.to_sql_with_params();
        trace!(%sql, params = params.len(), "executing query");
        client.fetch_all(&sql, &params).await
    }
}

impl<M: Entity> QueryBuilder<M> {
    /// Execute this query and hydrate each row into the target entity
    pub async fn fetch(&self, client: &dyn QueryClient) -> OrmResult<Vec<M>> {
        let rows = self.fetch_rows(client).await?;
        rows.iter().map(M::from_row).collect()
    }
}

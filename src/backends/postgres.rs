//! PostgreSQL execution backend over sqlx

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row, TypeInfo};
use tracing::trace;

use crate::error::{OrmError, OrmResult};
use crate::model::SqlRow;
use crate::query::QueryClient;

/// Query client backed by a sqlx Postgres connection pool
#[derive(Debug, Clone)]
pub struct PgClient {
    pool: PgPool,
}

impl PgClient {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> OrmResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl QueryClient for PgClient {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<SqlRow>> {
        trace!(sql, param_count = params.len(), "executing query");
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_value(query, param)?;
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

fn bind_value<'q>(query: PgQuery<'q>, value: &Value) -> OrmResult<PgQuery<'q>> {
    match value {
        Value::Null => Ok(query.bind(Option::<String>::None)),
        Value::Bool(b) => Ok(query.bind(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(query.bind(i))
            } else if let Some(f) = n.as_f64() {
                Ok(query.bind(f))
            } else {
                Err(OrmError::Serialization(format!(
                    "unsupported numeric parameter: {}",
                    n
                )))
            }
        }
        Value::String(s) => Ok(query.bind(s.clone())),
        Value::Array(_) | Value::Object(_) => Ok(query.bind(value.clone())),
    }
}

fn decode_row(row: &PgRow) -> OrmResult<SqlRow> {
    let mut out = SqlRow::new();
    for column in row.columns() {
        let name = column.name();
        let value = decode_column(row, name, column.type_info().name())?;
        out.set(name, value);
    }
    Ok(out)
}

fn decode_column(row: &PgRow, name: &str, type_name: &str) -> OrmResult<Value> {
    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(name)?.map(Value::from),
        "INT2" => row.try_get::<Option<i16>, _>(name)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(name)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(name)?.map(Value::from),
        "FLOAT4" => row.try_get::<Option<f32>, _>(name)?.map(Value::from),
        "FLOAT8" => row.try_get::<Option<f64>, _>(name)?.map(Value::from),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(name)?
            .map(|u| Value::String(u.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)?
            .map(|t| Value::String(t.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(name)?
            .map(|t| Value::String(t.to_string())),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(name)?
            .map(|d| Value::String(d.to_string())),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(name)?,
        _ => row.try_get::<Option<String>, _>(name)?.map(Value::String),
    };
    Ok(value.unwrap_or(Value::Null))
}

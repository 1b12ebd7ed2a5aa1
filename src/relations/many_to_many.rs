//! Many-to-many relation - descriptor, pivot queries, and eager merge
//!
//! The relation spans three tables: the owning table, the related table,
//! and the junction (pivot) table between them. Both query shapes are an
//! inner join of the related table against the pivot table, with every
//! projected pivot column aliased under a `pivot_` prefix so it cannot
//! collide with the related entity's own columns.

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::debug;

use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, RelationTarget, SqlRow};
use crate::query::{QueryBuilder, QueryClient};
use crate::schema::pivot_alias;

use super::keys::{resolve, ResolvedKeys};
use super::options::ManyToManyOptions;
use super::preload::{PreloadContext, Preloader};

/// A declared many-to-many relation between two entity types
///
/// Construction is cheap and performs no validation; `boot` resolves and
/// validates the key set exactly once and caches the outcome, success or
/// failure. After boot the descriptor is immutable; per-call pivot
/// selection goes through [`PreloadContext`], never through the
/// descriptor.
pub struct ManyToMany<O, R> {
    relation: String,
    options: ManyToManyOptions,
    booted: OnceCell<Result<ResolvedKeys, OrmError>>,
    _owner: PhantomData<fn() -> O>,
    _related: PhantomData<fn() -> R>,
}

impl<O, R> std::fmt::Debug for ManyToMany<O, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManyToMany")
            .field("relation", &self.relation)
            .field("options", &self.options)
            .field("booted", &self.booted.get().is_some())
            .finish()
    }
}

impl<O, R> ManyToMany<O, R>
where
    O: Entity + RelationTarget<R>,
    R: Entity,
{
    /// Declare a relation under the given name with explicit overrides
    pub fn new(relation: impl Into<String>, options: ManyToManyOptions) -> Self {
        Self {
            relation: relation.into(),
            options,
            booted: OnceCell::new(),
            _owner: PhantomData,
            _related: PhantomData,
        }
    }

    /// Declare a relation with all-convention key derivation
    pub fn conventional(relation: impl Into<String>) -> Self {
        Self::new(relation, ManyToManyOptions::default())
    }

    pub fn name(&self) -> &str {
        &self.relation
    }

    /// Resolve and validate the key set, exactly once
    ///
    /// Idempotent: repeated calls return the cached outcome, including a
    /// cached failure. Relies on the related entity's descriptor being
    /// finalized by the time of the first call.
    pub fn boot(&self) -> OrmResult<&ResolvedKeys> {
        let outcome = self
            .booted
            .get_or_init(|| resolve(O::descriptor(), R::descriptor(), &self.relation, &self.options));
        match outcome {
            Ok(keys) => Ok(keys),
            Err(err) => Err(err.clone()),
        }
    }

    /// Projected pivot columns for one call: the statically declared
    /// columns first, then per-call additions, deduplicated
    fn pivot_projection(&self, keys: &ResolvedKeys, ctx: &PreloadContext) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for column in keys.pivot_columns.iter().chain(ctx.extra_pivot_columns()) {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.clone());
            }
        }
        columns
    }

    /// Aliases carried into each related instance's extras
    fn pivot_aliases(&self, keys: &ResolvedKeys, ctx: &PreloadContext) -> Vec<String> {
        let mut aliases = vec![
            keys.pivot_foreign_key_alias.clone(),
            keys.pivot_related_foreign_key_alias.clone(),
        ];
        aliases.extend(self.pivot_projection(keys, ctx).iter().map(|c| pivot_alias(c)));
        aliases
    }

    /// Shared projection and join of both query shapes
    fn base_query(&self, keys: &ResolvedKeys, ctx: &PreloadContext) -> QueryBuilder<R> {
        let related_table = R::table_name();
        let mut query = QueryBuilder::new()
            .select(&format!("{}.*", related_table))
            .select_raw(format!(
                "{}.{} AS {}",
                keys.pivot_table, keys.pivot_foreign_key, keys.pivot_foreign_key_alias
            ))
            .select_raw(format!(
                "{}.{} AS {}",
                keys.pivot_table, keys.pivot_related_foreign_key, keys.pivot_related_foreign_key_alias
            ));
        for column in self.pivot_projection(keys, ctx) {
            query = query.select_raw(format!(
                "{}.{} AS {}",
                keys.pivot_table,
                column,
                pivot_alias(&column)
            ));
        }
        query
            .from(related_table)
            .join(
                &keys.pivot_table,
                &format!("{}.{}", related_table, keys.related_adapter_key),
                &format!("{}.{}", keys.pivot_table, keys.pivot_related_foreign_key),
            )
    }

    /// A parent's local-key value, or the contract error when the
    /// selecting query excluded that column
    fn local_value(&self, parent: &O, keys: &ResolvedKeys) -> OrmResult<Value> {
        parent
            .get(&keys.local_key)
            .ok_or_else(|| OrmError::UndefinedLocalValue {
                relation: self.relation.clone(),
                owner: O::entity_name().to_string(),
                key: keys.local_key.clone(),
            })
    }

    /// Query for the relation rows of a single parent instance
    pub fn get_query(&self, parent: &O, ctx: &PreloadContext) -> OrmResult<QueryBuilder<R>> {
        let keys = self.boot()?;
        let value = self.local_value(parent, keys)?;
        Ok(self
            .base_query(keys, ctx)
            .where_eq(&format!("{}.{}", keys.pivot_table, keys.pivot_foreign_key), value))
    }

    /// Batched query for the relation rows of many parent instances
    ///
    /// Fails fast on the first parent missing its local-key value; no
    /// partial query is ever issued. Duplicate key values pass through
    /// into the IN clause unchanged. An empty parent set is rejected
    /// rather than producing an empty IN list.
    pub fn get_eager_query(&self, parents: &[O], ctx: &PreloadContext) -> OrmResult<QueryBuilder<R>> {
        let keys = self.boot()?;
        if parents.is_empty() {
            return Err(OrmError::Query(format!(
                "cannot build an eager query for {}.{} without parent rows",
                O::entity_name(),
                self.relation
            )));
        }
        let values = parents
            .iter()
            .map(|parent| self.local_value(parent, keys))
            .collect::<OrmResult<Vec<Value>>>()?;
        Ok(self
            .base_query(keys, ctx)
            .where_in(&format!("{}.{}", keys.pivot_table, keys.pivot_foreign_key), values))
    }

    /// Group eager-query rows by parent and assign each parent its slice
    ///
    /// Rows are grouped by the value under the pivot foreign-key alias;
    /// each parent receives freshly hydrated instances in result-row
    /// order, with the selected pivot aliases copied into each
    /// instance's extras. Parents without matching rows receive an empty
    /// collection.
    pub fn merge(&self, parents: &mut [O], rows: &[SqlRow], ctx: &PreloadContext) -> OrmResult<()> {
        let keys = self.boot()?;
        let aliases = self.pivot_aliases(keys, ctx);

        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, row) in rows.iter().enumerate() {
            let group_value = row
                .get(&keys.pivot_foreign_key_alias)
                .cloned()
                .unwrap_or(Value::Null);
            groups.entry(value_key(&group_value)).or_default().push(index);
        }

        for parent in parents.iter_mut() {
            let value = self.local_value(parent, keys)?;
            let indices = groups.get(&value_key(&value)).map(Vec::as_slice).unwrap_or(&[]);

            let mut related = Vec::with_capacity(indices.len());
            for &index in indices {
                let row = &rows[index];
                let mut instance = R::from_row(row)?;
                for alias in &aliases {
                    if let Some(extra) = row.get(alias) {
                        instance.set_extra(alias.clone(), extra.clone());
                    }
                }
                related.push(instance);
            }
            parent.set_related(&self.relation, related);
        }
        Ok(())
    }
}

#[async_trait]
impl<O, R> Preloader<O> for ManyToMany<O, R>
where
    O: Entity + RelationTarget<R> + 'static,
    R: Entity + 'static,
{
    fn relation_name(&self) -> &str {
        &self.relation
    }

    async fn eager_load(
        &self,
        parents: &mut [O],
        client: &dyn QueryClient,
        ctx: &PreloadContext,
    ) -> OrmResult<()> {
        let query = self.get_eager_query(parents, ctx)?;
        debug!(
            relation = %self.relation,
            parents = parents.len(),
            "preloading many-to-many relation"
        );
        let rows = query.fetch_rows(client).await?;
        self.merge(parents, &rows, ctx)
    }
}

/// Canonical grouping key for a dynamically-typed value
///
/// Numbers group by their textual form, so an `i64` parent attribute
/// matches the same value decoded from a result row.
fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

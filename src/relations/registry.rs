//! Per-entity relation registry and preload orchestration

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use crate::error::{OrmError, OrmResult};
use crate::model::Entity;
use crate::query::QueryClient;

use super::preload::{PreloadContext, PreloadCustomizer, Preloader};

/// The named relations declared for one owning entity type
///
/// Lookup is by relation name; preloading an unknown name is an error
/// regardless of how many parents were passed, so a mistyped relation
/// never succeeds silently on an empty batch.
pub struct RelationSet<O: Entity> {
    relations: DashMap<String, Arc<dyn Preloader<O>>>,
}

impl<O: Entity> Default for RelationSet<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Entity> RelationSet<O> {
    pub fn new() -> Self {
        Self {
            relations: DashMap::new(),
        }
    }

    /// Register a relation under its declared name
    pub fn declare(&self, relation: Arc<dyn Preloader<O>>) {
        self.relations.insert(relation.relation_name().to_string(), relation);
    }

    /// Look up a declared relation by name
    pub fn get(&self, relation: &str) -> OrmResult<Arc<dyn Preloader<O>>> {
        self.relations
            .get(relation)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| OrmError::UnknownRelation {
                relation: relation.to_string(),
                owner: O::entity_name().to_string(),
            })
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.relations.contains_key(relation)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Preload a relation onto a batch of parent instances
    ///
    /// An empty batch resolves the relation name and returns without
    /// touching the database. The customizer, when given, runs against a
    /// fresh context before the relation builds its query.
    pub async fn preload(
        &self,
        relation: &str,
        parents: &mut [O],
        client: &dyn QueryClient,
        customize: Option<PreloadCustomizer<'_>>,
    ) -> OrmResult<()> {
        let preloader = self.get(relation)?;
        if parents.is_empty() {
            trace!(relation, "skipping preload for empty parent set");
            return Ok(());
        }
        let mut ctx = PreloadContext::new();
        if let Some(customize) = customize {
            customize(&mut ctx);
        }
        preloader.eager_load(parents, client, &ctx).await
    }
}

impl<O: Entity> std::fmt::Debug for RelationSet<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .relations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        f.debug_struct("RelationSet").field("relations", &names).finish()
    }
}

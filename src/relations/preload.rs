//! Preload plumbing - per-call query context and the preloader seam

use async_trait::async_trait;

use crate::error::OrmResult;
use crate::model::Entity;
use crate::query::QueryClient;

/// Mutable query context scoped to a single preload call
///
/// A caller-supplied customizer receives this context to widen the pivot
/// projection for one call; the shared relation descriptor is never
/// touched.
#[derive(Debug, Clone, Default)]
pub struct PreloadContext {
    pivot_columns: Vec<String>,
}

impl PreloadContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request additional pivot columns for this call only
    pub fn pivot_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pivot_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Pivot columns added by this call, in request order
    pub fn extra_pivot_columns(&self) -> &[String] {
        &self.pivot_columns
    }
}

/// Caller-supplied hook that customizes a single preload call
pub type PreloadCustomizer<'a> = &'a (dyn Fn(&mut PreloadContext) + Send + Sync);

/// Object-safe seam between the relation registry and concrete relations
///
/// Each relation kind implements the two-step protocol behind this
/// trait: issue one batched query for the full parent set, then merge
/// in memory. One preload call is one query, regardless of parent count.
#[async_trait]
pub trait Preloader<O: Entity>: Send + Sync {
    /// Name under which the relation was declared
    fn relation_name(&self) -> &str;

    /// Load and assign the relation for every parent in the batch
    async fn eager_load(
        &self,
        parents: &mut [O],
        client: &dyn QueryClient,
        ctx: &PreloadContext,
    ) -> OrmResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_accumulates_pivot_columns() {
        let mut ctx = PreloadContext::new();
        ctx.pivot_columns(["proficiency"]).pivot_columns(["level"]);
        assert_eq!(ctx.extra_pivot_columns(), ["proficiency", "level"]);
    }
}

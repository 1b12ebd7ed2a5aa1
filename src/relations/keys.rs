//! Key resolution - computes the four key pairs of a many-to-many relation
//!
//! Pure functions over entity descriptors: no I/O, and no pivot-table
//! schema introspection. Pivot key names are convention derivations
//! unless explicitly overridden.

use serde::{Deserialize, Serialize};

use crate::error::{OrmError, OrmResult};
use crate::schema::{pivot_alias, pivot_foreign_key_name, pivot_table_name, EntityDescriptor};

use super::options::ManyToManyOptions;

/// Fallback key name when an entity declares no primary column
const DEFAULT_KEY: &str = "id";

/// The fully resolved key set for a many-to-many relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedKeys {
    /// Column on the owning entity used to match parent rows
    pub local_key: String,
    /// Storage column backing `local_key`
    pub local_adapter_key: String,

    /// Column on the related entity
    pub related_key: String,
    /// Storage column backing `related_key`
    pub related_adapter_key: String,

    /// Junction table name
    pub pivot_table: String,

    /// Pivot column referencing the owning entity, and its projection alias
    pub pivot_foreign_key: String,
    pub pivot_foreign_key_alias: String,

    /// Pivot column referencing the related entity, and its projection alias
    pub pivot_related_foreign_key: String,
    pub pivot_related_foreign_key_alias: String,

    /// Extra pivot columns to project
    pub pivot_columns: Vec<String>,
}

/// Resolve the key set for a declared relation
///
/// Defaults: the local/related keys fall back to each side's primary
/// column; the pivot keys derive from the entity type names anchored to
/// each side's primary storage column, so a `local_key`/`related_key`
/// override alone never shifts pivot naming.
pub fn resolve(
    owner: &EntityDescriptor,
    related: &EntityDescriptor,
    relation: &str,
    options: &ManyToManyOptions,
) -> OrmResult<ResolvedKeys> {
    let local_name = options
        .local_key
        .clone()
        .or_else(|| owner.primary_column().map(|c| c.name.clone()))
        .unwrap_or_else(|| DEFAULT_KEY.to_string());
    let local = owner
        .find_column(&local_name)
        .ok_or_else(|| OrmError::MissingLocalKey {
            owner: owner.entity.clone(),
            key: local_name.clone(),
            relation: relation.to_string(),
        })?;

    let related_name = options
        .related_key
        .clone()
        .or_else(|| related.primary_column().map(|c| c.name.clone()))
        .unwrap_or_else(|| DEFAULT_KEY.to_string());
    let related_col =
        related
            .find_column(&related_name)
            .ok_or_else(|| OrmError::MissingRelatedKey {
                related: related.entity.clone(),
                key: related_name.clone(),
                owner: owner.entity.clone(),
                relation: relation.to_string(),
            })?;

    // Pivot naming anchors on each side's primary storage column, not on
    // whatever local/related key the declaration picked.
    let owner_anchor = owner
        .primary_column()
        .map(|c| c.adapter_key().to_string())
        .unwrap_or_else(|| DEFAULT_KEY.to_string());
    let related_anchor = related
        .primary_column()
        .map(|c| c.adapter_key().to_string())
        .unwrap_or_else(|| DEFAULT_KEY.to_string());

    let pivot_foreign_key = options
        .pivot_foreign_key
        .clone()
        .unwrap_or_else(|| pivot_foreign_key_name(&owner.entity, &owner_anchor));
    let pivot_related_foreign_key = options
        .pivot_related_foreign_key
        .clone()
        .unwrap_or_else(|| pivot_foreign_key_name(&related.entity, &related_anchor));

    let pivot_table = options
        .pivot_table
        .clone()
        .unwrap_or_else(|| pivot_table_name(&owner.table, &related.table));

    Ok(ResolvedKeys {
        local_key: local.name.clone(),
        local_adapter_key: local.adapter_key().to_string(),
        related_key: related_col.name.clone(),
        related_adapter_key: related_col.adapter_key().to_string(),
        pivot_table,
        pivot_foreign_key_alias: pivot_alias(&pivot_foreign_key),
        pivot_foreign_key,
        pivot_related_foreign_key_alias: pivot_alias(&pivot_related_foreign_key),
        pivot_related_foreign_key,
        pivot_columns: options.pivot_columns.clone(),
    })
}

//! Core entity trait - the capability interface read by the relation engine
//!
//! Concrete entities (usually macro-generated in a full framework) expose
//! their static descriptor plus dynamic attribute access. The relation
//! engine only goes through this trait; it never touches concrete fields.

use std::fmt::Debug;

use serde_json::Value;

use crate::error::OrmResult;
use crate::schema::EntityDescriptor;

use super::extras::Extras;
use super::row::SqlRow;

/// Core trait for mapped entity types
pub trait Entity: Debug + Send + Sync + Sized {
    /// Static metadata for this type, built once at registration time
    fn descriptor() -> &'static EntityDescriptor;

    /// Type identifier used in naming conventions and error messages
    fn entity_name() -> &'static str {
        &Self::descriptor().entity
    }

    /// Table name for this entity
    fn table_name() -> &'static str {
        &Self::descriptor().table
    }

    /// Current value of a declared column on this instance
    ///
    /// Returns `None` when the attribute is unset, typically because the
    /// selecting query excluded that column.
    fn get(&self, column: &str) -> Option<Value>;

    /// Hydrate an instance from a result row
    fn from_row(row: &SqlRow) -> OrmResult<Self>;

    /// Side-channel attributes not part of the declared schema
    fn extras(&self) -> &Extras;

    /// Mutable access to the side-channel attributes
    fn extras_mut(&mut self) -> &mut Extras;

    /// Attach a side-channel attribute, e.g. an aliased pivot value
    fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extras_mut().set(key, value);
    }
}

/// Assignment seam for relation values
///
/// An owning entity implements this once per related type it declares a
/// collection relation to; the eager-load merger goes through it to hand
/// each parent its group of hydrated children.
pub trait RelationTarget<R>: Entity {
    /// Store the loaded collection under the given relation name
    fn set_related(&mut self, relation: &str, related: Vec<R>);
}

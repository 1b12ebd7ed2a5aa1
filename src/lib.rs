//! # opal-orm: Relationship Resolution for Opal
//!
//! Many-to-many relationship engine: key inference and validation,
//! pivot-aware query construction, and collection-wide eager loading
//! with per-instance pivot extras.
//!
//! Entities describe their columns through [`schema::EntityDescriptor`]
//! and implement the [`model::Entity`] trait; relations are declared as
//! [`relations::ManyToMany`] descriptors and preloaded in batch through
//! a [`relations::RelationSet`].

pub mod backends;
pub mod error;
pub mod model;
pub mod query;
pub mod relations;
pub mod schema;

pub use error::{OrmError, OrmResult};
pub use model::{Entity, Extras, RelationTarget, SqlRow};
pub use query::{QueryBuilder, QueryClient};
pub use relations::{
    ManyToMany, ManyToManyOptions, PreloadContext, Preloader, RelationSet, ResolvedKeys,
};
pub use schema::{ColumnDef, EntityDescriptor};

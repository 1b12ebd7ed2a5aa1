//! Entity runtime surface - trait, extras side channel, and row shape

pub mod entity;
pub mod extras;
pub mod row;

pub use entity::{Entity, RelationTarget};
pub use extras::Extras;
pub use row::SqlRow;

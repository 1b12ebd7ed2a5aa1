//! Relationship definitions and eager loading

pub mod keys;
pub mod many_to_many;
pub mod options;
pub mod preload;
pub mod registry;

pub use keys::{resolve, ResolvedKeys};
pub use many_to_many::ManyToMany;
pub use options::ManyToManyOptions;
pub use preload::{PreloadContext, PreloadCustomizer, Preloader};
pub use registry::RelationSet;

//! Schema metadata - entity descriptors, columns, and naming conventions

pub mod column;
pub mod descriptor;
pub mod naming;

pub use column::ColumnDef;
pub use descriptor::EntityDescriptor;
pub use naming::{pivot_alias, pivot_foreign_key_name, pivot_table_name, pluralize, singularize, snake_case};

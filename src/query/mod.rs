//! Query building - SELECT builder, SQL generation, and execution seam

pub mod builder;
pub mod execution;
pub mod joins;
pub mod select;
pub mod sql_generation;
pub mod types;
pub mod where_clause;

pub use builder::QueryBuilder;
pub use execution::QueryClient;
pub use types::{JoinType, OrderDirection, QueryOperator};

//! Error types for the relation engine
//!
//! A single crate-wide error enum plus a result alias. The relation
//! variants carry structured fields because their rendered messages are
//! contract-visible: callers match on them, so the format strings below
//! are part of the public API.

use thiserror::Error;

/// Result type alias for relation and query operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for relation resolution, query building and preloading
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrmError {
    /// Database connection or query execution error
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Query building error
    #[error("Query error: {0}")]
    Query(String),

    /// The owning entity has no usable local key for a relation
    #[error("E_MISSING_RELATED_LOCAL_KEY: {owner}.{key} required by {owner}.{relation} relation is missing")]
    MissingLocalKey {
        owner: String,
        key: String,
        relation: String,
    },

    /// The related entity has no usable related key for a relation
    #[error("E_MISSING_RELATED_FOREIGN_KEY: {related}.{key} required by {owner}.{relation} relation is missing")]
    MissingRelatedKey {
        related: String,
        key: String,
        owner: String,
        relation: String,
    },

    /// A parent instance is missing its local-key value at query time,
    /// typically because the selecting query excluded that column
    #[error("Cannot preload {relation}, value of {owner}.{key} is undefined")]
    UndefinedLocalValue {
        relation: String,
        owner: String,
        key: String,
    },

    /// Preload was requested for a name with no declared relation
    #[error("E_UNDEFINED_RELATION: {relation} is not defined as a relationship on {owner}")]
    UnknownRelation { relation: String, owner: String },
}

impl From<sqlx::Error> for OrmError {
    fn from(err: sqlx::Error) -> Self {
        OrmError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        OrmError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for OrmError {
    fn from(err: anyhow::Error) -> Self {
        OrmError::Database(err.to_string())
    }
}

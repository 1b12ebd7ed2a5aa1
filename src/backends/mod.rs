//! Database execution backends

pub mod postgres;

pub use postgres::PgClient;

//! SQLite backend for the phonebook service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. [`SqliteStore`] implements both the
//! person CRUD store and the executor for model-generated queries.

mod encode;
mod query;
mod schema;
mod store;

pub mod error;

pub use error::{Error, QueryError, Result};
pub use query::QueryLimits;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;

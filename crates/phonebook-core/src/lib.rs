//! Core types and trait definitions for the phonebook service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, translation and API crates all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod person;
pub mod query;
pub mod store;

pub use error::{Error, Result};

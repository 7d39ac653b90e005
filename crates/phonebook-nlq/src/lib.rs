//! Natural-language to SQL translation for the phonebook service.
//!
//! A [`Translator`] turns an English question into a single completion
//! request against an injected [`CompletionClient`]; [`parse`] turns the
//! model's fenced text into a [`SqlTranslation`] ready for a
//! [`QueryExecutor`](phonebook_core::store::QueryExecutor).

#![allow(async_fn_in_trait)]

pub mod client;
pub mod error;
pub mod openai;
pub mod parse;
pub mod prompt;
pub mod schema;
pub mod translator;

pub use client::{ChatMessage, CompletionClient, CompletionRequest, Role};
pub use error::{ParseError, TranslateError};
pub use parse::parse;
pub use phonebook_core::query::SqlTranslation;
pub use schema::SchemaDescription;
pub use translator::Translator;

//! Parsing of model responses into a [`SqlTranslation`].
//!
//! The expected shape is a Markdown code fence labelled `sql` holding the
//! template, optionally followed by a fence labelled `json` holding a flat
//! object of parameter values:
//!
//! ````text
//! ```sql
//! SELECT name FROM people WHERE id = :person_id;
//! ```
//! ```json
//! { "person_id": "d59abfc4-3aae-4e29-875b-7b56e021ad42" }
//! ```
//! ````
//!
//! Only the first fence of each kind is considered. A missing `json` fence
//! means the template takes no parameters. The SQL itself is not inspected
//! here; that is the executor's job.

use std::sync::LazyLock;

use phonebook_core::query::{SqlParams, SqlTranslation};
use regex::Regex;

use crate::ParseError;

static SQL_FENCE: LazyLock<Regex> = LazyLock::new(|| fence("sql"));
static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| fence("json"));

/// Matches a fence opened with ```` ```<label> ```` (case-insensitive) on its
/// own line and captures everything up to the next closing ```` ``` ````.
fn fence(label: &str) -> Regex {
  Regex::new(&format!(r"(?is)```[ \t]*{label}\b[^\n]*\n(.*?)```"))
    .expect("fence pattern is valid")
}

fn first_block<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
  re.captures(text)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().trim())
    .filter(|block| !block.is_empty())
}

/// Extract the SQL template and optional parameters from raw model text.
pub fn parse(raw: &str) -> Result<SqlTranslation, ParseError> {
  let raw = raw.trim();

  let template = first_block(&SQL_FENCE, raw).ok_or(ParseError::SqlTemplateNotFound)?;

  let params = first_block(&JSON_FENCE, raw)
    .map(serde_json::from_str::<SqlParams>)
    .transpose()
    .map_err(ParseError::MalformedParameters)?;

  Ok(SqlTranslation { template: template.to_owned(), params })
}

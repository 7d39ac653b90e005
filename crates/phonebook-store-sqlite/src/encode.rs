//! Encoding and decoding helpers between Rust domain types and the
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings.

use phonebook_core::{person::Person, query::SqlValue};
use rusqlite::types::{Value, ValueRef};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── SqlValue ────────────────────────────────────────────────────────────────

/// Convert a bound parameter into an owned driver value.
pub fn encode_value(value: &SqlValue) -> Value {
  match value {
    SqlValue::Null => Value::Null,
    SqlValue::Integer(i) => Value::Integer(*i),
    SqlValue::Real(f) => Value::Real(*f),
    SqlValue::Text(s) => Value::Text(s.clone()),
    SqlValue::Blob(b) => Value::Blob(b.clone()),
  }
}

/// Convert a column read back from a result row. Text that is not valid
/// UTF-8 is decoded lossily.
pub fn decode_value(value: ValueRef<'_>) -> SqlValue {
  match value {
    ValueRef::Null => SqlValue::Null,
    ValueRef::Integer(i) => SqlValue::Integer(i),
    ValueRef::Real(f) => SqlValue::Real(f),
    ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub id:   String,
  pub name: String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person { id: decode_uuid(&self.id)?, name: self.name })
  }
}

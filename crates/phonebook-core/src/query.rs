//! Types flowing through the natural-language query pipeline.
//!
//! A model response is parsed into a [`SqlTranslation`] (template plus bound
//! parameters); executing it yields a sequence of [`Row`]s.

use std::collections::BTreeMap;

use serde::{
  Deserialize, Deserializer, Serialize, Serializer,
  de::Error as _,
  ser::SerializeMap,
};

// ─── Values ──────────────────────────────────────────────────────────────────

/// A single SQL value, either bound into a statement or read back from one.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl Serialize for SqlValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Null => serializer.serialize_none(),
      Self::Integer(i) => serializer.serialize_i64(*i),
      Self::Real(f) => serializer.serialize_f64(*f),
      Self::Text(s) => serializer.serialize_str(s),
      Self::Blob(b) => serializer.serialize_str(&hex::encode(b)),
    }
  }
}

/// Parameters arrive as JSON scalars. Booleans become `0`/`1` the way SQLite
/// stores them; arrays and objects are rejected.
impl<'de> Deserialize<'de> for SqlValue {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
      serde_json::Value::Null => Ok(Self::Null),
      serde_json::Value::Bool(b) => Ok(Self::Integer(i64::from(b))),
      serde_json::Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          Ok(Self::Integer(i))
        } else if let Some(f) = n.as_f64() {
          Ok(Self::Real(f))
        } else {
          Err(D::Error::custom(format!("number out of range: {n}")))
        }
      }
      serde_json::Value::String(s) => Ok(Self::Text(s)),
      other => Err(D::Error::custom(format!(
        "parameter values must be scalars, got {other}"
      ))),
    }
  }
}

impl From<&str> for SqlValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for SqlValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for SqlValue {
  fn from(i: i64) -> Self { Self::Integer(i) }
}

// ─── Translation ─────────────────────────────────────────────────────────────

/// Placeholder name (without its `:`, `@` or `$` sigil) to literal value.
pub type SqlParams = BTreeMap<String, SqlValue>;

/// A SQL template with named placeholders and the values to bind into them.
///
/// The template is only ever handed to the store driver for preparation;
/// values are bound by the driver, never spliced into the text.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlTranslation {
  pub template: String,
  /// `None` when the model response carried no parameter block.
  pub params:   Option<SqlParams>,
}

impl SqlTranslation {
  pub fn new(template: impl Into<String>) -> Self {
    Self { template: template.into(), params: None }
  }

  pub fn with_param(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
    self
      .params
      .get_or_insert_with(BTreeMap::new)
      .insert(name.into(), value.into());
    self
  }

  /// Look up a placeholder's value. Accepts the name with or without sigil.
  pub fn param(&self, placeholder: &str) -> Option<&SqlValue> {
    let name = placeholder.trim_start_matches([':', '@', '$']);
    self.params.as_ref()?.get(name)
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One result row: column name to value, in the order the store returned the
/// columns. Serialises as a JSON object with keys in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
  columns: Vec<(String, SqlValue)>,
}

impl Row {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
    self.columns.push((column.into(), value));
  }

  pub fn get(&self, column: &str) -> Option<&SqlValue> {
    self
      .columns
      .iter()
      .find(|(name, _)| name == column)
      .map(|(_, value)| value)
  }

  pub fn columns(&self) -> impl Iterator<Item = &str> {
    self.columns.iter().map(|(name, _)| name.as_str())
  }

  pub fn len(&self) -> usize { self.columns.len() }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }
}

impl FromIterator<(String, SqlValue)> for Row {
  fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
    Self { columns: iter.into_iter().collect() }
  }
}

impl Serialize for Row {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.columns.len()))?;
    for (name, value) in &self.columns {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

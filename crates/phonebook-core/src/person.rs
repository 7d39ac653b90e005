//! Person records and the webhook events that mutate them.
//!
//! Events are never stored. Each one is applied directly to the `people`
//! table; the last write wins and out-of-order delivery is not detected.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Person ──────────────────────────────────────────────────────────────────

/// A person as currently known to the store. The id is stable across renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:   Uuid,
  pub name: String,
}

// ─── Event payloads ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonAdded {
  pub person_id: Uuid,
  pub name:      String,
  #[serde(deserialize_with = "deserialize_timestamp")]
  pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonRenamed {
  pub person_id: Uuid,
  pub name:      String,
  #[serde(deserialize_with = "deserialize_timestamp")]
  pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonRemoved {
  pub person_id: Uuid,
  #[serde(deserialize_with = "deserialize_timestamp")]
  pub timestamp: DateTime<Utc>,
}

/// Accepts RFC 3339 (`2023-10-10T12:34:56Z`) as well as naive ISO 8601
/// date-times (`2023-01-01T12:00:00`), which are taken to be UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw:?}")))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .ok()
    .map(|naive| naive.and_utc())
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// The raw webhook envelope: a type tag plus an untyped content object.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
  pub payload_type:    String,
  #[serde(default)]
  pub payload_content: serde_json::Value,
}

/// A decoded webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonEvent {
  Added(PersonAdded),
  Renamed(PersonRenamed),
  Removed(PersonRemoved),
}

impl PersonEvent {
  /// Decode the envelope's content according to its `payload_type` tag.
  pub fn from_payload(payload: WebhookPayload) -> Result<Self> {
    let WebhookPayload { payload_type, payload_content } = payload;
    match payload_type.as_str() {
      "PersonAdded" => decode("PersonAdded", payload_content).map(Self::Added),
      "PersonRenamed" => decode("PersonRenamed", payload_content).map(Self::Renamed),
      "PersonRemoved" => decode("PersonRemoved", payload_content).map(Self::Removed),
      _ => Err(Error::UnknownPayloadType(payload_type)),
    }
  }

  pub fn payload_type(&self) -> &'static str {
    match self {
      Self::Added(_) => "PersonAdded",
      Self::Renamed(_) => "PersonRenamed",
      Self::Removed(_) => "PersonRemoved",
    }
  }

  pub fn person_id(&self) -> Uuid {
    match self {
      Self::Added(e) => e.person_id,
      Self::Renamed(e) => e.person_id,
      Self::Removed(e) => e.person_id,
    }
  }

  pub fn timestamp(&self) -> DateTime<Utc> {
    match self {
      Self::Added(e) => e.timestamp,
      Self::Renamed(e) => e.timestamp,
      Self::Removed(e) => e.timestamp,
    }
  }
}

fn decode<T>(payload_type: &'static str, content: serde_json::Value) -> Result<T>
where
  T: for<'de> Deserialize<'de>,
{
  // A struct would also deserialise from a JSON array; only objects count.
  if !content.is_object() {
    return Err(Error::InvalidPayload {
      payload_type,
      source: serde_json::Error::custom("payload_content must be an object"),
    });
  }
  serde_json::from_value(content).map_err(|source| Error::InvalidPayload { payload_type, source })
}

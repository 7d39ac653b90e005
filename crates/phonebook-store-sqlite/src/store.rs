//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`].

use std::path::Path;

use phonebook_core::{person::Person, store::PersonStore};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  QueryLimits, Result,
  encode::{RawPerson, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A phonebook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn:   tokio_rusqlite::Connection,
  pub(crate) limits: QueryLimits,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, limits: QueryLimits::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, limits: QueryLimits::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the bounds applied to model-generated queries.
  pub fn with_query_limits(mut self, limits: QueryLimits) -> Self {
    self.limits = limits;
    self
  }

  pub fn query_limits(&self) -> QueryLimits { self.limits }

  /// Close the connection. Clones of this store fail from then on.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = crate::Error;

  async fn add_person(&self, person: Person) -> Result<Person> {
    let id_str = encode_uuid(person.id);
    let name   = person.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (id, name) VALUES (?1, ?2)
           ON CONFLICT (id) DO UPDATE SET name = excluded.name",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn rename_person(&self, id: Uuid, name: String) -> Result<Option<Person>> {
    let id_str   = encode_uuid(id);
    let new_name = name.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE people SET name = ?2 WHERE id = ?1",
          rusqlite::params![id_str, new_name],
        )?)
      })
      .await?;

    Ok((changed > 0).then_some(Person { id, name }))
  }

  async fn remove_person(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM people WHERE id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name FROM people WHERE id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawPerson {
                id:   row.get(0)?,
                name: row.get(1)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }
}

//! SQL schema for the phonebook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per person currently known. Removal is physical.
CREATE TABLE IF NOT EXISTS people (
    id    TEXT PRIMARY KEY,   -- hyphenated lowercase UUID
    name  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS people_name_idx ON people(name);

PRAGMA user_version = 1;
";

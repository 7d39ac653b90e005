//! Description of the tables the model is allowed to query.
//!
//! Kept as data so it can be configured and tested apart from the prompt
//! wording; [`SchemaDescription::to_ddl`] renders it for the prompt.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaDescription {
  /// SQL dialect named in the prompt, e.g. `"SQLite"`.
  pub dialect: String,
  pub tables:  Vec<TableDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDescription {
  pub name:    String,
  pub columns: Vec<ColumnDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnDescription {
  pub name:        String,
  pub sql_type:    String,
  #[serde(default)]
  pub primary_key: bool,
  #[serde(default = "default_nullable")]
  pub nullable:    bool,
}

fn default_nullable() -> bool { true }

impl ColumnDescription {
  pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
    Self {
      name:        name.into(),
      sql_type:    sql_type.into(),
      primary_key: false,
      nullable:    true,
    }
  }

  pub fn primary_key(mut self) -> Self {
    self.primary_key = true;
    self
  }

  pub fn not_null(mut self) -> Self {
    self.nullable = false;
    self
  }
}

impl SchemaDescription {
  /// The `people` table as laid out by the SQLite store.
  pub fn people_sqlite() -> Self {
    Self {
      dialect: "SQLite".into(),
      tables:  vec![TableDescription {
        name:    "people".into(),
        columns: vec![
          ColumnDescription::new("id", "TEXT").primary_key(),
          ColumnDescription::new("name", "TEXT").not_null(),
        ],
      }],
    }
  }

  /// Render every table as a `CREATE TABLE` statement.
  pub fn to_ddl(&self) -> String {
    self
      .tables
      .iter()
      .map(TableDescription::to_ddl)
      .collect::<Vec<_>>()
      .join("\n\n")
  }
}

impl Default for SchemaDescription {
  fn default() -> Self { Self::people_sqlite() }
}

impl TableDescription {
  pub fn to_ddl(&self) -> String {
    let columns = self
      .columns
      .iter()
      .map(|c| {
        let mut line = format!("    {} {}", c.name, c.sql_type);
        if c.primary_key {
          line.push_str(" PRIMARY KEY");
        } else if !c.nullable {
          line.push_str(" NOT NULL");
        }
        line
      })
      .collect::<Vec<_>>()
      .join(",\n");
    format!("CREATE TABLE {} (\n{}\n);", self.name, columns)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn people_table_ddl() {
    assert_eq!(
      SchemaDescription::people_sqlite().to_ddl(),
      "CREATE TABLE people (\n    id TEXT PRIMARY KEY,\n    name TEXT NOT NULL\n);",
    );
  }

  #[test]
  fn multiple_tables_are_separated() {
    let schema = SchemaDescription {
      dialect: "SQLite".into(),
      tables:  vec![
        TableDescription { name: "a".into(), columns: vec![ColumnDescription::new("x", "INTEGER")] },
        TableDescription { name: "b".into(), columns: vec![ColumnDescription::new("y", "TEXT")] },
      ],
    };
    assert_eq!(
      schema.to_ddl(),
      "CREATE TABLE a (\n    x INTEGER\n);\n\nCREATE TABLE b (\n    y TEXT\n);",
    );
  }

  #[test]
  fn deserialises_with_defaults() {
    let schema: SchemaDescription = serde_json::from_str(
      r#"{
        "dialect": "SQLite",
        "tables": [{
          "name": "people",
          "columns": [
            { "name": "id", "sql_type": "TEXT", "primary_key": true },
            { "name": "name", "sql_type": "TEXT", "nullable": false }
          ]
        }]
      }"#,
    )
    .unwrap();
    assert_eq!(schema, SchemaDescription::people_sqlite());
  }
}

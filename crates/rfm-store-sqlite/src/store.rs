//! [`SqliteStore`] — the SQLite implementation of the snapshot and event
//! stores.

use std::path::Path;

use rfm_core::{
  ChangeEvent, Person, flatten_event, flatten_person, person_keys,
  store::{EventStore, SnapshotStore},
};
use rusqlite::{Connection, params_from_iter};

use crate::{
  Error, Result,
  encode::{RawPerson, encode_dt, encode_value},
  schema::schema,
};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// Names of the persons and events tables.
#[derive(Debug, Clone)]
pub struct Tables {
  persons: String,
  events:  String,
}

impl Tables {
  /// Validate and build the table names. Names must match
  /// `[A-Za-z_][A-Za-z0-9_]*`.
  pub fn new(persons: impl Into<String>, events: impl Into<String>) -> Result<Self> {
    let persons = validate_table_name(persons.into())?;
    let events = validate_table_name(events.into())?;
    Ok(Self { persons, events })
  }

  pub fn persons(&self) -> &str { &self.persons }

  pub fn events(&self) -> &str { &self.events }
}

impl Default for Tables {
  fn default() -> Self {
    Self {
      persons: "persons".to_string(),
      events:  "events".to_string(),
    }
  }
}

fn validate_table_name(name: String) -> Result<String> {
  let mut chars = name.chars();
  let valid = chars
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
  if valid { Ok(name) } else { Err(Error::InvalidTableName(name)) }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A snapshot + change-log store backed by a single SQLite file.
///
/// The connection is closed when the store is dropped, so it is released on
/// every exit path; [`SqliteStore::close`] closes it explicitly and reports
/// failures.
pub struct SqliteStore {
  conn:   Connection,
  tables: Tables,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>, tables: Tables) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening sqlite store");
    let conn = Connection::open(path)?;
    Self::init(conn, tables)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory(tables: Tables) -> Result<Self> {
    Self::init(Connection::open_in_memory()?, tables)
  }

  fn init(conn: Connection, tables: Tables) -> Result<Self> {
    conn.execute_batch(&schema(&tables))?;
    Ok(Self { conn, tables })
  }

  pub fn tables(&self) -> &Tables { &self.tables }

  /// Close the connection, surfacing any error from SQLite.
  pub fn close(self) -> Result<()> {
    self.conn.close().map_err(|(_, e)| Error::Database(e))
  }

  /// All stored events as flattened JSON documents, oldest first.
  pub fn events(&self) -> Result<Vec<serde_json::Value>> {
    let sql = format!(
      "SELECT document FROM {} ORDER BY event_id",
      self.tables.events()
    );
    let mut stmt = self.conn.prepare(&sql)?;
    let raws = stmt
      .query_map([], |row| row.get::<_, String>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws
      .iter()
      .map(|s| serde_json::from_str(s).map_err(Error::from))
      .collect()
  }

  fn insert_persons(conn: &Connection, table: &str, persons: &[Person]) -> Result<()> {
    let keys: Vec<String> = person_keys().collect();
    let columns = keys
      .iter()
      .map(|k| format!("\"{k}\""))
      .collect::<Vec<_>>()
      .join(", ");
    let placeholders = (1..=keys.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})");

    let mut stmt = conn.prepare(&sql)?;
    for person in persons {
      let values = flatten_person(person)
        .iter()
        .map(|(_, v)| encode_value(v))
        .collect::<Result<Vec<_>>>()?;
      stmt.execute(params_from_iter(values))?;
    }
    Ok(())
  }
}

// ─── SnapshotStore impl ──────────────────────────────────────────────────────

impl SnapshotStore for SqliteStore {
  type Error = Error;

  fn find_all(&self) -> Result<Vec<Person>> {
    let columns = person_keys()
      .map(|k| format!("\"{k}\""))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "SELECT {columns} FROM {} ORDER BY rowid",
      self.tables.persons()
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let raws = stmt
      .query_map([], RawPerson::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    let persons = raws
      .into_iter()
      .map(RawPerson::into_person)
      .collect::<Result<Vec<_>>>()?;
    tracing::info!(count = persons.len(), "fetched stored persons");
    Ok(persons)
  }

  fn delete_all(&self) -> Result<usize> {
    let sql = format!("DELETE FROM {}", self.tables.persons());
    Ok(self.conn.execute(&sql, [])?)
  }

  fn insert_many(&self, persons: &[Person]) -> Result<()> {
    Self::insert_persons(&self.conn, self.tables.persons(), persons)
  }

  /// Delete and re-insert inside one transaction.
  fn replace_all(&self, persons: &[Person]) -> Result<()> {
    let tx = self.conn.unchecked_transaction()?;
    let deleted = tx.execute(&format!("DELETE FROM {}", self.tables.persons()), [])?;
    Self::insert_persons(&tx, self.tables.persons(), persons)?;
    tx.commit()?;
    tracing::info!(deleted, inserted = persons.len(), "replaced stored snapshot");
    Ok(())
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  fn insert_events(&self, events: &[ChangeEvent]) -> Result<()> {
    let tx = self.conn.unchecked_transaction()?;
    {
      let sql = format!(
        "INSERT INTO {} (action, date, document) VALUES (?1, ?2, ?3)",
        self.tables.events()
      );
      let mut stmt = tx.prepare(&sql)?;
      for event in events {
        let document = serde_json::to_string(&flatten_event(event))?;
        stmt.execute(rusqlite::params![
          event.action.as_str(),
          encode_dt(event.date),
          document,
        ])?;
      }
    }
    tx.commit()?;
    tracing::info!(count = events.len(), "stored change events");
    Ok(())
  }
}

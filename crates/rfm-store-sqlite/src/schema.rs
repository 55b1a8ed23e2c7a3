//! SQL schema for the RFM SQLite store.
//!
//! Table names are configurable, so the DDL is rendered per store rather than
//! kept as a single constant. Every statement is idempotent.

use rfm_core::person_keys;

use crate::store::Tables;

/// SQLite column type for each person key, in field-table order.
fn column_type(key: &str) -> &'static str {
  match key {
    "fullName" => "TEXT NOT NULL",
    "isTerr" => "INTEGER NOT NULL",
    "rfmId" => "INTEGER NOT NULL",
    // birthDate: ISO date; aliases: JSON array; both nullable.
    _ => "TEXT",
  }
}

/// Full schema DDL for `tables`.
pub fn schema(tables: &Tables) -> String {
  let columns = person_keys()
    .map(|key| {
      let ty = column_type(&key);
      format!("    \"{key}\" {ty}")
    })
    .collect::<Vec<_>>()
    .join(",\n");

  format!(
    "
PRAGMA journal_mode = WAL;

-- The last scraped snapshot; replaced wholesale on every run.
CREATE TABLE IF NOT EXISTS {persons} (
{columns}
);

-- Change log; strictly append-only.
CREATE TABLE IF NOT EXISTS {events} (
    event_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    action    TEXT NOT NULL,   -- 'added' | 'removed' | 'changed'
    date      TEXT NOT NULL,   -- ISO 8601 UTC; detection time
    document  TEXT NOT NULL    -- flattened event as a JSON object
);

CREATE INDEX IF NOT EXISTS {persons}_name_idx ON {persons}(\"fullName\");
CREATE INDEX IF NOT EXISTS {events}_date_idx  ON {events}(date);
",
    persons = tables.persons(),
    events = tables.events(),
  )
}

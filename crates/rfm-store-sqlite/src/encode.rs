//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates are `YYYY-MM-DD`, booleans are
//! `0`/`1`, and alias lists are compact JSON arrays.

use chrono::{DateTime, NaiveDate, Utc};
use rfm_core::{FieldValue, Person};
use rusqlite::types::Value;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// Column value for one flattened field.
pub fn encode_value(value: &FieldValue) -> Result<Value> {
  Ok(match value {
    FieldValue::Null => Value::Null,
    FieldValue::Bool(b) => Value::Integer(i64::from(*b)),
    FieldValue::Int(i) => Value::Integer(*i),
    FieldValue::Text(s) => Value::Text(s.clone()),
    FieldValue::Date(d) => Value::Text(encode_date(*d)),
    FieldValue::Timestamp(dt) => Value::Text(encode_dt(*dt)),
    FieldValue::List(items) => Value::Text(serde_json::to_string(items)?),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a persons row.
pub struct RawPerson {
  pub full_name:  String,
  pub is_terr:    bool,
  pub birth_date: Option<String>,
  pub address:    Option<String>,
  pub aliases:    Option<String>,
  pub rfm_id:     i64,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      full_name:  row.get(0)?,
      is_terr:    row.get(1)?,
      birth_date: row.get(2)?,
      address:    row.get(3)?,
      aliases:    row.get(4)?,
      rfm_id:     row.get(5)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    let birth_date = self.birth_date.as_deref().map(decode_date).transpose()?;
    let aliases: Option<Vec<String>> = self
      .aliases
      .as_deref()
      .map(serde_json::from_str)
      .transpose()?;

    Ok(
      Person::new(self.rfm_id, self.full_name)
        .with_terr(self.is_terr)
        .with_birth_date(birth_date)
        .with_address(self.address)
        .with_aliases(aliases),
    )
  }
}

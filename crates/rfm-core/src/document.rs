//! Flat key/value documents — the external shape of persons and events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer, ser::SerializeMap};

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// A single value stored under a document key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
  Null,
  Bool(bool),
  Int(i64),
  Text(String),
  /// A calendar date, serialised as `YYYY-MM-DD`.
  Date(NaiveDate),
  /// A UTC instant, serialised as RFC 3339.
  Timestamp(DateTime<Utc>),
  List(Vec<String>),
}

impl FieldValue {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }
}

impl From<bool> for FieldValue {
  fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<i64> for FieldValue {
  fn from(v: i64) -> Self { Self::Int(v) }
}

impl From<&str> for FieldValue {
  fn from(v: &str) -> Self { Self::Text(v.to_string()) }
}

impl From<String> for FieldValue {
  fn from(v: String) -> Self { Self::Text(v) }
}

impl From<NaiveDate> for FieldValue {
  fn from(v: NaiveDate) -> Self { Self::Date(v) }
}

impl From<DateTime<Utc>> for FieldValue {
  fn from(v: DateTime<Utc>) -> Self { Self::Timestamp(v) }
}

impl From<Vec<String>> for FieldValue {
  fn from(v: Vec<String>) -> Self { Self::List(v) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// An insertion-ordered mapping of field name to [`FieldValue`].
///
/// Keys are unique: inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  entries: Vec<(String, FieldValue)>,
}

impl Document {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
    let key = key.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(k, _)| *k == key) {
      Some((_, slot)) => *slot = value,
      None => self.entries.push((key, value)),
    }
  }

  pub fn get(&self, key: &str) -> Option<&FieldValue> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  pub fn contains_key(&self, key: &str) -> bool { self.get(key).is_some() }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(k, _)| k.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// A copy of this document with every key passed through
  /// [`to_camel_case`].
  pub fn camelized(&self) -> Self {
    let mut out = Self::new();
    for (k, v) in &self.entries {
      out.insert(to_camel_case(k), v.clone());
    }
    out
  }
}

impl Serialize for Document {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (k, v) in &self.entries {
      map.serialize_entry(k, v)?;
    }
    map.end()
  }
}

// ─── Key naming ──────────────────────────────────────────────────────────────

/// Convert an internal snake-case name into the external camel-case key.
///
/// Each word is title-cased (a letter is upper-cased when it follows a
/// non-letter, lower-cased otherwise), underscores are dropped, and the
/// first character of the result is lower-cased: `old_birth_date` becomes
/// `oldBirthDate`.
pub fn to_camel_case(name: &str) -> String {
  let mut joined = String::with_capacity(name.len());
  let mut after_letter = false;
  for c in name.chars() {
    if c.is_alphabetic() {
      if after_letter {
        joined.extend(c.to_lowercase());
      } else {
        joined.extend(c.to_uppercase());
      }
      after_letter = true;
    } else {
      after_letter = false;
      if c != '_' {
        joined.push(c);
      }
    }
  }

  let mut chars = joined.chars();
  match chars.next() {
    Some(first) => first.to_lowercase().chain(chars).collect(),
    None => String::new(),
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! The [`Person`] record and its statically declared field table.
//!
//! A person is immutable once built. Differences between two runs are
//! expressed as two distinct `Person` values, never as mutation.

use chrono::NaiveDate;

use crate::document::{Document, FieldValue, to_camel_case};

// ─── Person ──────────────────────────────────────────────────────────────────

/// One designated person as published in the registry list.
///
/// `Person` intentionally does not implement `PartialEq`: whether two records
/// denote the same individual is decided by
/// [`PersonIdentity`](crate::identity::PersonIdentity), and field-wise
/// comparison goes through [`PERSON_FIELDS`].
#[derive(Debug, Clone)]
pub struct Person {
  full_name:  String,
  is_terr:    bool,
  birth_date: Option<NaiveDate>,
  address:    Option<String>,
  aliases:    Option<Vec<String>>,
  /// Registry position number. Used to locate a person across snapshots,
  /// never reported as a changed value.
  rfm_id:     i64,
}

impl Person {
  /// A person with only the required fields set.
  pub fn new(rfm_id: i64, full_name: impl Into<String>) -> Self {
    Self {
      full_name: full_name.into(),
      is_terr: false,
      birth_date: None,
      address: None,
      aliases: None,
      rfm_id,
    }
  }

  pub fn with_terr(mut self, is_terr: bool) -> Self {
    self.is_terr = is_terr;
    self
  }

  pub fn with_birth_date(mut self, birth_date: Option<NaiveDate>) -> Self {
    self.birth_date = birth_date;
    self
  }

  pub fn with_address(mut self, address: Option<String>) -> Self {
    self.address = address;
    self
  }

  pub fn with_aliases(mut self, aliases: Option<Vec<String>>) -> Self {
    self.aliases = aliases;
    self
  }

  pub fn full_name(&self) -> &str { &self.full_name }

  pub fn is_terr(&self) -> bool { self.is_terr }

  pub fn birth_date(&self) -> Option<NaiveDate> { self.birth_date }

  pub fn address(&self) -> Option<&str> { self.address.as_deref() }

  pub fn aliases(&self) -> Option<&[String]> { self.aliases.as_deref() }

  pub fn rfm_id(&self) -> i64 { self.rfm_id }

  /// All fields in declaration order, keyed by their internal names.
  pub fn fields(&self) -> Document {
    let mut doc = Document::new();
    for field in PERSON_FIELDS {
      doc.insert(field.name, (field.get)(self));
    }
    doc
  }
}

// ─── Field table ─────────────────────────────────────────────────────────────

/// One entry of [`PERSON_FIELDS`].
pub struct Field {
  /// Internal snake-case name; the external key is its camel-case form.
  pub name:     &'static str,
  pub get:      fn(&Person) -> FieldValue,
  /// Copied into every `changed` event so the event is self-describing.
  pub seed:     bool,
  /// Whether a difference in this field counts as a change.
  pub diffable: bool,
}

/// Every field of [`Person`], in declaration order. Flattening, change
/// detection and storage all iterate this table.
pub const PERSON_FIELDS: &[Field] = &[
  Field { name: "full_name", get: get_full_name, seed: true, diffable: true },
  Field { name: "is_terr", get: get_is_terr, seed: true, diffable: true },
  Field { name: "birth_date", get: get_birth_date, seed: true, diffable: true },
  Field { name: "address", get: get_address, seed: true, diffable: true },
  Field { name: "aliases", get: get_aliases, seed: false, diffable: true },
  Field { name: "rfm_id", get: get_rfm_id, seed: false, diffable: false },
];

fn get_full_name(p: &Person) -> FieldValue { p.full_name.as_str().into() }

fn get_is_terr(p: &Person) -> FieldValue { p.is_terr.into() }

fn get_birth_date(p: &Person) -> FieldValue { p.birth_date.into() }

fn get_address(p: &Person) -> FieldValue { p.address.clone().into() }

fn get_aliases(p: &Person) -> FieldValue { p.aliases.clone().into() }

fn get_rfm_id(p: &Person) -> FieldValue { p.rfm_id.into() }

/// Flatten a person into its external form: every field, camel-case keys.
pub fn flatten_person(person: &Person) -> Document { person.fields().camelized() }

/// The external column/key names of a flattened person, in table order.
pub fn person_keys() -> impl Iterator<Item = String> {
  PERSON_FIELDS.iter().map(|f| to_camel_case(f.name))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

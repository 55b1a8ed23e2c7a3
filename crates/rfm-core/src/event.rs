//! Change events produced by reconciliation.
//!
//! Events are write-once: the reconciler creates them, the event store appends
//! them, nothing updates them.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
  document::Document,
  person::Person,
};

/// What happened to a person between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Added,
  Removed,
  Changed,
}

impl Action {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Added => "added",
      Self::Removed => "removed",
      Self::Changed => "changed",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single detected change.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
  pub action: Action,
  /// When the change was detected (not when the registry published it).
  pub date:   DateTime<Utc>,
  /// Payload keyed by internal snake-case names.
  pub fields: Document,
}

impl ChangeEvent {
  /// A person that appeared; carries every field.
  pub fn added(person: &Person, date: DateTime<Utc>) -> Self {
    Self { action: Action::Added, date, fields: person.fields() }
  }

  /// A person that disappeared; carries every field.
  pub fn removed(person: &Person, date: DateTime<Utc>) -> Self {
    Self { action: Action::Removed, date, fields: person.fields() }
  }

  /// A matched person whose fields differ; `fields` comes from
  /// [`detect_changes`](crate::reconcile::detect_changes).
  pub fn changed(fields: Document, date: DateTime<Utc>) -> Self {
    Self { action: Action::Changed, date, fields }
  }
}

/// Flatten an event into its external form: camel-case payload keys followed
/// by `action` and `date`.
pub fn flatten_event(event: &ChangeEvent) -> Document {
  let mut doc = event.fields.camelized();
  doc.insert("action", event.action.as_str());
  doc.insert("date", event.date);
  doc
}

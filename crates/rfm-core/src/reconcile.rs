//! Snapshot reconciliation: previous + current snapshot → change events.
//!
//! Matching always goes through the set's [`IdentityStrategy`]; field-level
//! comparison of a matched pair iterates [`PERSON_FIELDS`].

use chrono::{DateTime, Utc};

use crate::{
  document::Document,
  event::ChangeEvent,
  identity::{IdentitySet, IdentityStrategy},
  person::{PERSON_FIELDS, Person},
};

/// Reconcile two snapshots, stamping every event with the current time.
///
/// See [`reconcile_at`].
pub fn reconcile<S: IdentityStrategy<Person>>(
  current: &IdentitySet<Person, S>,
  previous: &IdentitySet<Person, S>,
) -> Vec<ChangeEvent> {
  reconcile_at(current, previous, Utc::now())
}

/// Compute the change events that lead from `previous` to `current`.
///
/// - every previous person without a match in `current` → `removed`
/// - every current person without a match in `previous` → `added`
/// - every matched pair differing in a diffable field → one `changed`
///
/// Removals come first, then additions and changes in `current` order.
pub fn reconcile_at<S: IdentityStrategy<Person>>(
  current: &IdentitySet<Person, S>,
  previous: &IdentitySet<Person, S>,
  detected_at: DateTime<Utc>,
) -> Vec<ChangeEvent> {
  let mut events = Vec::new();

  for old in previous {
    if !current.contains(old) {
      tracing::debug!(name = old.full_name(), rfm_id = old.rfm_id(), "person removed");
      events.push(ChangeEvent::removed(old, detected_at));
    }
  }

  for new in current {
    match previous.get(new) {
      Some(old) => {
        if let Some(fields) = detect_changes(new, old) {
          tracing::debug!(name = new.full_name(), rfm_id = new.rfm_id(), "person changed");
          events.push(ChangeEvent::changed(fields, detected_at));
        }
      }
      None => {
        tracing::debug!(name = new.full_name(), rfm_id = new.rfm_id(), "person added");
        events.push(ChangeEvent::added(new, detected_at));
      }
    }
  }

  events
}

/// Field-level diff of a matched pair. Returns `None` when every diffable
/// field is equal.
///
/// The payload starts with the current values of the seed fields, followed by
/// an `old_<field>` / `new_<field>` pair for each differing field.
pub fn detect_changes(current: &Person, previous: &Person) -> Option<Document> {
  let mut changes: Option<Document> = None;

  for field in PERSON_FIELDS.iter().filter(|f| f.diffable) {
    let new_value = (field.get)(current);
    let old_value = (field.get)(previous);
    if new_value == old_value {
      continue;
    }

    let doc = changes.get_or_insert_with(|| {
      let mut seeded = Document::new();
      for seed in PERSON_FIELDS.iter().filter(|f| f.seed) {
        seeded.insert(seed.name, (seed.get)(current));
      }
      seeded
    });
    doc.insert(format!("old_{}", field.name), old_value);
    doc.insert(format!("new_{}", field.name), new_value);
  }

  changes
}

// ─── Tests ────────────────────────────────────────────────────────────────────

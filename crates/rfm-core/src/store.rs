//! Storage traits for persisted snapshots and change events.
//!
//! Implemented by storage backends (e.g. `rfm-store-sqlite`). The run
//! pipeline depends on these abstractions, not on a concrete backend.

use crate::{event::ChangeEvent, person::Person};

/// The persisted snapshot: the person list as of the last successful run.
pub trait SnapshotStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every stored person.
  fn find_all(&self) -> Result<Vec<Person>, Self::Error>;

  /// Delete every stored person; returns how many were removed.
  fn delete_all(&self) -> Result<usize, Self::Error>;

  /// Append `persons` to the store.
  fn insert_many(&self, persons: &[Person]) -> Result<(), Self::Error>;

  /// Replace the stored snapshot with `persons`.
  ///
  /// The default runs `delete_all` then `insert_many` with no atomicity;
  /// backends with transactions should override it.
  fn replace_all(&self, persons: &[Person]) -> Result<(), Self::Error> {
    self.delete_all()?;
    self.insert_many(persons)
  }
}

/// The append-only change log.
pub trait EventStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append `events` in order.
  fn insert_events(&self, events: &[ChangeEvent]) -> Result<(), Self::Error>;
}

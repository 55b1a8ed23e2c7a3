//! Core types for the RFM registry watcher.
//!
//! This crate is deliberately free of HTTP, HTML and database dependencies.
//! It defines the [`Person`] record, the identity rule used to match persons
//! across snapshots, the flattened [`Document`] form handed to storage, and
//! the reconciler that turns two snapshots into [`ChangeEvent`]s.

pub mod document;
pub mod event;
pub mod identity;
pub mod person;
pub mod reconcile;
pub mod store;

pub use document::{Document, FieldValue, to_camel_case};
pub use event::{Action, ChangeEvent, flatten_event};
pub use identity::{IdentitySet, IdentityStrategy, PersonIdentity, Snapshot};
pub use person::{Field, PERSON_FIELDS, Person, flatten_person, person_keys};
pub use reconcile::{detect_changes, reconcile, reconcile_at};

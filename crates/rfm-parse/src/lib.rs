//! Decoder for the RFM designated-persons page.
//!
//! Turns the raw HTML page into registry entries, and each entry into a
//! [`rfm_core::Person`]. Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let entry = "12. Ivanov Ivan, (Vania), 01.01.1980 г.р., Moscow;";
//! let person = rfm_parse::parse_person(entry).unwrap();
//! assert_eq!(person.rfm_id(), 12);
//! ```

mod entry;
pub mod error;
mod extract;

pub use entry::{BIRTH_DATE_FORMAT, TERROR_MARKER, parse_person};
pub use error::{Error, Result};
pub use extract::{ENTRY_SELECTOR, LIST_SELECTOR, extract_entries};
use rfm_core::Snapshot;

/// Parse every entry in order into a [`Snapshot`].
///
/// The first malformed entry aborts the whole batch. Entries that resolve to
/// an already parsed identity replace it (latest wins).
pub fn parse_entries<I, S>(entries: I) -> Result<Snapshot>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut snapshot = Snapshot::new();
  for entry in entries {
    let person = parse_person(entry.as_ref())?;
    if let Some(displaced) = snapshot.insert(person) {
      tracing::warn!(
        name = displaced.full_name(),
        rfm_id = displaced.rfm_id(),
        "duplicate registry entry replaced by a later one"
      );
    }
  }
  tracing::info!(count = snapshot.len(), "parsed persons");
  Ok(snapshot)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_entries_collapses_identity_duplicates() {
    let snapshot = parse_entries([
      "1. Ivanov Ivan, 01.01.1980 г.р., Moscow;",
      "2. Petrov Petr, , Kazan;",
      "3. Ivanov Ivan, 01.01.1980 г.р., Tver;",
    ])
    .unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.as_slice()[0].address(), Some("Tver"));
  }

  #[test]
  fn parse_entries_aborts_on_bad_id() {
    let err = parse_entries(["1. A, , x;", "two. B, , y;"]).unwrap_err();
    assert!(matches!(err, Error::InvalidId { .. }), "{err}");
  }
}

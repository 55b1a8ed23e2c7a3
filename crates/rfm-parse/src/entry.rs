//! Registry entry grammar.
//!
//! An entry is comma-delimited free text consumed left to right:
//!
//! ```text
//! <id>. <full name>[*], [(<alias>; <alias>…),] [<DD.MM.YYYY> г.р.], <address…>;
//! ```
//!
//! Only the leading fields are split off; the address keeps any commas it
//! contains.

use chrono::NaiveDate;
use rfm_core::Person;

use crate::error::{Error, Result};

/// Suffix on the name token marking the person as a terrorist (as opposed to
/// an extremist) designation.
pub const TERROR_MARKER: char = '*';

/// Birth-date token format; the literal suffix reads "year of birth".
pub const BIRTH_DATE_FORMAT: &str = "%d.%m.%Y г.р.";

/// Split at the first `sep`. A missing separator leaves the whole input on
/// the left and an empty remainder.
fn split_first<'a>(s: &'a str, sep: &str) -> (&'a str, &'a str) {
  s.split_once(sep).unwrap_or((s, ""))
}

/// Parse one registry entry into a [`Person`].
///
/// A malformed birth date is logged and dropped; a malformed id or missing
/// name rejects the entry.
pub fn parse_person(entry: &str) -> Result<Person> {
  tracing::debug!(entry, "parsing person entry");

  let rest = entry.trim_end_matches([';', ' ']);
  let (head, rest) = split_first(rest, ",");

  let mut head = head.trim();
  let is_terr = head.ends_with(TERROR_MARKER);
  if is_terr {
    head = &head[..head.len() - TERROR_MARKER.len_utf8()];
  }

  let (id, full_name) = split_first(head, ". ");
  let rfm_id = id.trim().parse::<i64>().map_err(|source| Error::InvalidId {
    entry: entry.to_string(),
    id: id.to_string(),
    source,
  })?;
  if full_name.is_empty() {
    return Err(Error::MissingName(entry.to_string()));
  }

  let (token, mut rest) = split_first(rest, ",");
  let mut token = token.trim();
  let aliases = match token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
    Some(inner) => {
      let aliases = inner.split(';').map(|a| a.trim().to_string()).collect();
      (token, rest) = split_first(rest, ",");
      token = token.trim();
      Some(aliases)
    }
    None => None,
  };

  let birth_date = parse_birth_date(token);

  let address = rest.trim_matches([',', ' ']);
  let address = (!address.is_empty()).then(|| address.to_string());

  Ok(
    Person::new(rfm_id, full_name)
      .with_terr(is_terr)
      .with_birth_date(birth_date)
      .with_address(address)
      .with_aliases(aliases),
  )
}

/// An empty token means no birth date; an unparsable one is logged and
/// treated the same.
fn parse_birth_date(token: &str) -> Option<NaiveDate> {
  if token.is_empty() {
    return None;
  }
  match NaiveDate::parse_from_str(token, BIRTH_DATE_FORMAT) {
    Ok(date) => Some(date),
    Err(e) => {
      tracing::error!(token, error = %e, "failed to parse birth date");
      None
    }
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

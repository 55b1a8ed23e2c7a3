//! Error types for the rfm-parse decoder.

use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid registry id {id:?} in entry {entry:?}")]
  InvalidId {
    entry:  String,
    id:     String,
    #[source]
    source: ParseIntError,
  },

  #[error("missing full name in entry {0:?}")]
  MissingName(String),

  #[error("list container {0:?} not found in page")]
  ListNotFound(String),

  #[error("invalid selector {selector:?}: {reason}")]
  Selector { selector: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

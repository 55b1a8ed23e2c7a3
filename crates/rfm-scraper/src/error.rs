//! Error type for the scraper application.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("unknown run environment {0:?} (expected \"dev\" or \"prod\")")]
  UnknownEnv(String),

  #[error("invalid log level: {0:?}")]
  InvalidLogLevel(String),

  #[error("rfm.use_file is set but rfm.file_path is missing")]
  MissingFilePath,

  #[error("failed to open log file {path:?}: {source}")]
  LogFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to fetch {url}: {source}")]
  Fetch {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("failed to read {path:?}: {source}")]
  ReadFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("parse error: {0}")]
  Parse(#[from] rfm_parse::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

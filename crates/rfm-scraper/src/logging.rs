//! Tracing subscriber setup, driven by the `[log]` config section.

use std::{fs::OpenOptions, sync::Arc};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{Error, Result, config::LogConfig};

/// Parse a configured level name. Accepts the usual tracing names plus the
/// `warning`/`critical` spellings common in other logging setups.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
  let normalized = match level.trim().to_ascii_lowercase().as_str() {
    "warning" => "warn".to_string(),
    "critical" | "fatal" => "error".to_string(),
    other => other.to_string(),
  };
  normalized
    .parse()
    .map_err(|_| Error::InvalidLogLevel(level.to_string()))
}

/// Install the global subscriber. `RUST_LOG` refines the configured level.
///
/// Must run once, before any I/O.
pub fn init(log: &LogConfig) -> Result<()> {
  let level = parse_level(&log.level)?;
  let filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  match &log.file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::LogFile {
          path: path.clone(),
          source,
        })?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    }
    None => tracing_subscriber::fmt().with_env_filter(filter).init(),
  }
  Ok(())
}

//! Layered configuration.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. `config.toml` (required)
//! 2. `config.<env>.toml` (optional), `<env>` taken from `RFM_ENV`
//! 3. process environment, `RFM_<SECTION>__<KEY>` (e.g. `RFM_STORE__RFM_DB`)

use std::{fmt, path::{Path, PathBuf}, str::FromStr};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable selecting the run environment.
pub const ENV_VAR: &str = "RFM_ENV";

// ─── Run environment ─────────────────────────────────────────────────────────

/// `dev` may read the page from a local file; `prod` always fetches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunEnv {
  #[default]
  Dev,
  Prod,
}

impl RunEnv {
  /// Read [`ENV_VAR`]; unset means `dev`.
  pub fn from_env() -> Result<Self> {
    match std::env::var(ENV_VAR) {
      Ok(value) => value.parse(),
      Err(_) => Ok(Self::default()),
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Dev => "dev",
      Self::Prod => "prod",
    }
  }
}

impl FromStr for RunEnv {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "dev" => Ok(Self::Dev),
      "prod" => Ok(Self::Prod),
      other => Err(Error::UnknownEnv(other.to_string())),
    }
  }
}

impl fmt::Display for RunEnv {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Config shape ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
  pub rfm:   RfmConfig,
  pub store: StoreConfig,
  #[serde(default)]
  pub log:   LogConfig,
}

/// Where the registry page comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct RfmConfig {
  pub url:       String,
  /// Read the page from `file_path` instead of the network (ignored in prod).
  #[serde(default)]
  pub use_file:  bool,
  #[serde(default)]
  pub file_path: Option<PathBuf>,
}

/// SQLite files and table names for the snapshot and the change log.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  pub rfm_db:             PathBuf,
  #[serde(default = "default_persons_collection")]
  pub persons_collection: String,
  pub events_db:          PathBuf,
  #[serde(default = "default_events_collection")]
  pub events_collection:  String,
}

fn default_persons_collection() -> String { "persons".to_string() }

fn default_events_collection() -> String { "events".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Write log lines to this file instead of stdout.
  #[serde(default)]
  pub file:  Option<PathBuf>,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      file:  None,
    }
  }
}

impl ScraperConfig {
  /// Load `config.toml` and `config.<env>.toml` from `dir`, then apply
  /// `RFM_*` environment overrides.
  pub fn load(dir: &Path, env: RunEnv) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(dir.join("config.toml")))
      .add_source(
        config::File::from(dir.join(format!("config.{env}.toml"))).required(false),
      )
      .add_source(
        config::Environment::with_prefix("RFM")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    Ok(settings.try_deserialize()?)
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

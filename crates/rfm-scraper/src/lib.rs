//! RFM designated-persons scraper.
//!
//! Fetches the registry page, parses it into a snapshot, reconciles the
//! snapshot against the stored one and records the differences as change
//! events. All run-wide state lives in [`Context`], built once in `main` and
//! passed down explicitly.

pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pipeline;

pub use error::{Error, Result};

use crate::{
  config::{RunEnv, ScraperConfig},
  fetch::PageSource,
};

/// Process-wide settings for one run.
#[derive(Debug, Clone)]
pub struct Context {
  pub env:    RunEnv,
  pub config: ScraperConfig,
  /// Resolved from `config.rfm` and `env`.
  pub source: PageSource,
}

impl Context {
  pub fn new(env: RunEnv, config: ScraperConfig) -> Result<Self> {
    let source = PageSource::select(env, &config.rfm)?;
    Ok(Self { env, config, source })
  }
}

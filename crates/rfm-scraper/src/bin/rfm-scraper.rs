//! rfm-scraper binary.
//!
//! Reads `config.toml` and `config.<env>.toml` from the working directory
//! (`<env>` from `RFM_ENV`, default `dev`), runs one scrape and exits.
//! Any error aborts the run with a non-zero exit code.

use std::path::Path;

use anyhow::Context as _;
use rfm_scraper::{
  Context,
  config::{RunEnv, ScraperConfig},
  logging, pipeline,
};
use rfm_store_sqlite::{SqliteStore, Tables};

fn main() -> anyhow::Result<()> {
  let env = RunEnv::from_env().context("failed to read run environment")?;

  let config = ScraperConfig::load(Path::new("."), env)
    .context("failed to load configuration")?;

  // Logging must be up before any I/O; an invalid level stops here.
  logging::init(&config.log).context("failed to initialise logging")?;

  let ctx = Context::new(env, config).context("invalid page source config")?;
  tracing::info!(env = %ctx.env, "starting rfm scraper");

  let store_cfg = &ctx.config.store;
  let tables = Tables::new(
    store_cfg.persons_collection.as_str(),
    store_cfg.events_collection.as_str(),
  )
  .context("invalid table names")?;

  let snapshots = SqliteStore::open(&store_cfg.rfm_db, tables.clone())
    .with_context(|| format!("failed to open store at {:?}", store_cfg.rfm_db))?;

  // The change log may live in its own database file.
  let separate_events = if store_cfg.events_db == store_cfg.rfm_db {
    None
  } else {
    let store = SqliteStore::open(&store_cfg.events_db, tables)
      .with_context(|| format!("failed to open store at {:?}", store_cfg.events_db))?;
    Some(store)
  };
  let events = separate_events.as_ref().unwrap_or(&snapshots);

  let summary = pipeline::run(&ctx, &snapshots, events)
    .inspect_err(|e| tracing::error!(error = %e, "run failed"))
    .context("scraper run failed")?;

  tracing::info!(
    scraped = summary.scraped,
    previous = summary.previous,
    events = summary.events,
    bootstrap = summary.bootstrap,
    "run complete"
  );

  if let Some(store) = separate_events {
    store.close().context("failed to close events store")?;
  }
  snapshots.close().context("failed to close snapshot store")?;
  Ok(())
}

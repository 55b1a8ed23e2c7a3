//! One scraper run: fetch → parse → reconcile → persist.

use rfm_core::{
  Snapshot, reconcile,
  store::{EventStore, SnapshotStore},
};
use rfm_parse::{extract_entries, parse_entries};

use crate::{Context, Error, Result};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
  /// Persons parsed from the page.
  pub scraped:   usize,
  /// Persons in the stored snapshot before this run.
  pub previous:  usize,
  /// Change events written.
  pub events:    usize,
  /// No stored snapshot existed, so change detection was skipped.
  pub bootstrap: bool,
}

/// Run the full pipeline against the page source in `ctx`.
///
/// Any failure aborts the run before the next step starts; there is no
/// rollback of steps already completed.
pub fn run<S, E>(ctx: &Context, snapshots: &S, events: &E) -> Result<RunSummary>
where
  S: SnapshotStore,
  E: EventStore,
{
  let page = ctx.source.fetch()?;
  let entries = extract_entries(&page)?;
  let current = parse_entries(&entries)?;
  sync(&current, snapshots, events)
}

/// Reconcile `current` against the stored snapshot, append the change events
/// and replace the stored snapshot.
///
/// When the store holds no persons this is treated as the first run: no
/// events are generated, so a first load does not report the whole list as
/// added. An empty `current` never replaces the stored snapshot.
pub fn sync<S, E>(current: &Snapshot, snapshots: &S, events: &E) -> Result<RunSummary>
where
  S: SnapshotStore,
  E: EventStore,
{
  let previous: Snapshot = snapshots
    .find_all()
    .map_err(Error::store)?
    .into_iter()
    .collect();

  let bootstrap = previous.is_empty();
  let mut written = 0;

  if bootstrap {
    tracing::info!("stored snapshot is empty; skipping change detection");
  } else {
    let changes = reconcile(current, &previous);
    tracing::info!(count = changes.len(), "detected changes");
    if !changes.is_empty() {
      events.insert_events(&changes).map_err(Error::store)?;
      written = changes.len();
    }
  }

  if current.is_empty() {
    tracing::warn!("no persons scraped; keeping the stored snapshot");
  } else {
    snapshots
      .replace_all(current.as_slice())
      .map_err(Error::store)?;
  }

  Ok(RunSummary {
    scraped: current.len(),
    previous: previous.len(),
    events: written,
    bootstrap,
  })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{fs, path::Path};

  use rfm_core::Person;
  use rfm_store_sqlite::{SqliteStore, Tables};
  use tempfile::TempDir;

  use super::*;
  use crate::{
    config::{LogConfig, RfmConfig, RunEnv, ScraperConfig, StoreConfig},
    fetch::PageSource,
  };

  fn page(items: &[&str]) -> String {
    let lis: String = items.iter().map(|i| format!("<li>{i}</li>\n")).collect();
    format!(
      "<html><body><div id=\"russianFL\">\
       <ol class=\"terrorist-list\">\n{lis}</ol></div></body></html>"
    )
  }

  fn context(page_path: &Path) -> Context {
    Context {
      env:    RunEnv::Dev,
      config: ScraperConfig {
        rfm:   RfmConfig {
          url:       "https://example.invalid/list".into(),
          use_file:  true,
          file_path: Some(page_path.to_path_buf()),
        },
        store: StoreConfig {
          rfm_db:             ":memory:".into(),
          persons_collection: "persons".into(),
          events_db:          ":memory:".into(),
          events_collection:  "events".into(),
        },
        log:   LogConfig::default(),
      },
      source: PageSource::File {
        path: page_path.to_path_buf(),
      },
    }
  }

  struct Fixture {
    _dir:  TempDir,
    ctx:   Context,
    store: SqliteStore,
  }

  impl Fixture {
    fn new() -> Self {
      let dir = tempfile::tempdir().unwrap();
      let ctx = context(&dir.path().join("page.html"));
      let store = SqliteStore::open_in_memory(Tables::default()).unwrap();
      Self { _dir: dir, ctx, store }
    }

    fn run_with(&self, items: &[&str]) -> Result<RunSummary> {
      let PageSource::File { path } = &self.ctx.source else {
        unreachable!("fixture uses a file source")
      };
      fs::write(path, page(items)).unwrap();
      run(&self.ctx, &self.store, &self.store)
    }
  }

  const IVANOV: &str =
    "12. Ivanov Ivan Ivanovich, (Vania; Vanya), 01.01.1980 г.р., Moscow, Lenin st. 1;";
  const DOE: &str = "5. Doe John*, , , Unknown addr;";
  const PETROV: &str = "13. Petrov Petr, 02.02.1990 г.р., Kazan;";

  #[test]
  fn first_run_stores_snapshot_without_events() {
    let f = Fixture::new();
    let summary = f.run_with(&[IVANOV, DOE]).unwrap();

    assert_eq!(summary, RunSummary {
      scraped:   2,
      previous:  0,
      events:    0,
      bootstrap: true,
    });
    assert_eq!(f.store.find_all().unwrap().len(), 2);
    assert!(f.store.events().unwrap().is_empty());
  }

  #[test]
  fn unchanged_page_yields_no_events() {
    let f = Fixture::new();
    f.run_with(&[IVANOV, DOE]).unwrap();
    let summary = f.run_with(&[IVANOV, DOE]).unwrap();

    assert!(!summary.bootstrap);
    assert_eq!(summary.events, 0);
    assert!(f.store.events().unwrap().is_empty());
  }

  #[test]
  fn second_run_logs_added_removed_and_changed() {
    let f = Fixture::new();
    f.run_with(&[IVANOV, DOE]).unwrap();

    let moved = "12. Ivanov Ivan Ivanovich, (Vania; Vanya), 01.01.1980 г.р., Tver;";
    let summary = f.run_with(&[moved, PETROV]).unwrap();
    assert_eq!(summary.events, 3);

    let docs = f.store.events().unwrap();
    let actions: Vec<_> = docs.iter().map(|d| d["action"].as_str().unwrap()).collect();
    assert_eq!(actions, ["removed", "changed", "added"]);

    assert_eq!(docs[0]["fullName"], "Doe John");
    assert_eq!(docs[0]["isTerr"], true);
    assert_eq!(docs[1]["oldAddress"], "Moscow, Lenin st. 1");
    assert_eq!(docs[1]["newAddress"], "Tver");
    assert_eq!(docs[1]["birthDate"], "1980-01-01");
    assert!(docs[1].get("oldRfmId").is_none());
    assert_eq!(docs[2]["fullName"], "Petrov Petr");
    assert_eq!(docs[2]["rfmId"], 13);

    let stored: Vec<String> = f
      .store
      .find_all()
      .unwrap()
      .iter()
      .map(|p| p.full_name().to_string())
      .collect();
    assert_eq!(stored, ["Ivanov Ivan Ivanovich", "Petrov Petr"]);
  }

  #[test]
  fn empty_list_keeps_stored_snapshot() {
    let f = Fixture::new();
    f.run_with(&[IVANOV, DOE]).unwrap();
    let summary = f.run_with(&[]).unwrap();

    // Both stored persons are reported removed, but the snapshot stays.
    assert_eq!(summary.scraped, 0);
    assert_eq!(summary.events, 2);
    assert_eq!(f.store.find_all().unwrap().len(), 2);
  }

  #[test]
  fn malformed_entry_aborts_before_touching_the_store() {
    let f = Fixture::new();
    f.run_with(&[IVANOV]).unwrap();

    let err = f.run_with(&[DOE, "not-a-number. Someone, , x;"]).unwrap_err();
    assert!(matches!(err, Error::Parse(rfm_parse::Error::InvalidId { .. })), "{err}");
    assert_eq!(f.store.find_all().unwrap().len(), 1);
    assert!(f.store.events().unwrap().is_empty());
  }

  #[test]
  fn missing_list_container_is_fatal() {
    let f = Fixture::new();
    let PageSource::File { path } = &f.ctx.source else {
      unreachable!()
    };
    fs::write(path, "<html><body><p>maintenance</p></body></html>").unwrap();

    let err = run(&f.ctx, &f.store, &f.store).unwrap_err();
    assert!(matches!(err, Error::Parse(rfm_parse::Error::ListNotFound(_))), "{err}");
  }

  #[test]
  fn sync_accepts_a_prebuilt_snapshot() {
    let store = SqliteStore::open_in_memory(Tables::default()).unwrap();
    let snapshot: Snapshot = [Person::new(1, "A"), Person::new(2, "B")].into_iter().collect();

    let first = sync(&snapshot, &store, &store).unwrap();
    assert!(first.bootstrap);
    let second = sync(&snapshot, &store, &store).unwrap();
    assert_eq!(second.previous, 2);
    assert_eq!(second.events, 0);
  }
}

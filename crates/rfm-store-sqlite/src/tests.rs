//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, TimeZone, Utc};
use rfm_core::{
  ChangeEvent, Person, Snapshot, reconcile_at,
  store::{EventStore, SnapshotStore},
};

use crate::{Error, SqliteStore, Tables};

fn store() -> SqliteStore {
  SqliteStore::open_in_memory(Tables::default()).expect("in-memory store")
}

fn ivanov() -> Person {
  Person::new(12, "Ivanov Ivan Ivanovich")
    .with_terr(true)
    .with_birth_date(NaiveDate::from_ymd_opt(1980, 1, 1))
    .with_address(Some("Moscow, Lenin st. 1".into()))
    .with_aliases(Some(vec!["Vania".into(), "Vanya".into()]))
}

fn petrov() -> Person { Person::new(13, "Petrov Petr") }

// ─── Tables ──────────────────────────────────────────────────────────────────

#[test]
fn table_names_are_validated() {
  assert!(Tables::new("persons_v2", "_events").is_ok());
  for bad in ["", "1persons", "persons; DROP TABLE x", "per-sons"] {
    let err = Tables::new(bad, "events").unwrap_err();
    assert!(matches!(err, Error::InvalidTableName(_)), "{bad:?}");
  }
}

#[test]
fn custom_table_names_are_used() {
  let s = SqliteStore::open_in_memory(Tables::new("rfm", "rfm_log").unwrap()).unwrap();
  s.insert_many(&[petrov()]).unwrap();
  assert_eq!(s.find_all().unwrap().len(), 1);
  assert_eq!(s.tables().persons(), "rfm");
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[test]
fn empty_store_finds_nothing() {
  assert!(store().find_all().unwrap().is_empty());
}

#[test]
fn insert_and_find_round_trips_every_field() {
  let s = store();
  s.insert_many(&[ivanov(), petrov()]).unwrap();

  let found = s.find_all().unwrap();
  assert_eq!(found.len(), 2);

  let p = &found[0];
  assert_eq!(p.full_name(), "Ivanov Ivan Ivanovich");
  assert!(p.is_terr());
  assert_eq!(p.birth_date(), NaiveDate::from_ymd_opt(1980, 1, 1));
  assert_eq!(p.address(), Some("Moscow, Lenin st. 1"));
  assert_eq!(
    p.aliases(),
    Some(&["Vania".to_string(), "Vanya".to_string()][..])
  );
  assert_eq!(p.rfm_id(), 12);

  let q = &found[1];
  assert!(!q.is_terr());
  assert_eq!(q.birth_date(), None);
  assert_eq!(q.address(), None);
  assert_eq!(q.aliases(), None);
}

#[test]
fn stored_snapshot_reconciles_cleanly_against_itself() {
  let s = store();
  s.insert_many(&[ivanov(), petrov()]).unwrap();

  let loaded: Snapshot = s.find_all().unwrap().into_iter().collect();
  let fresh: Snapshot = [ivanov(), petrov()].into_iter().collect();
  let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
  assert!(reconcile_at(&fresh, &loaded, at).is_empty());
}

#[test]
fn delete_all_reports_count() {
  let s = store();
  s.insert_many(&[ivanov(), petrov()]).unwrap();
  assert_eq!(s.delete_all().unwrap(), 2);
  assert!(s.find_all().unwrap().is_empty());
}

#[test]
fn replace_all_swaps_snapshot() {
  let s = store();
  s.insert_many(&[ivanov(), petrov()]).unwrap();
  s.replace_all(&[Person::new(20, "New Person")]).unwrap();

  let found = s.find_all().unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].rfm_id(), 20);
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[test]
fn events_are_stored_as_flat_documents() {
  let s = store();
  let at = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
  s.insert_events(&[
    ChangeEvent::added(&ivanov(), at),
    ChangeEvent::removed(&petrov(), at),
  ])
  .unwrap();

  let docs = s.events().unwrap();
  assert_eq!(docs.len(), 2);
  assert_eq!(
    docs[0],
    serde_json::json!({
      "fullName": "Ivanov Ivan Ivanovich",
      "isTerr": true,
      "birthDate": "1980-01-01",
      "address": "Moscow, Lenin st. 1",
      "aliases": ["Vania", "Vanya"],
      "rfmId": 12,
      "action": "added",
      "date": "2024-03-04T05:06:07Z",
    })
  );
  assert_eq!(docs[1]["action"], "removed");
  assert_eq!(docs[1]["birthDate"], serde_json::Value::Null);
}

#[test]
fn empty_event_batch_is_a_no_op() {
  let s = store();
  s.insert_events(&[]).unwrap();
  assert!(s.events().unwrap().is_empty());
}

#[test]
fn close_releases_connection() {
  let s = store();
  s.insert_many(&[petrov()]).unwrap();
  s.close().unwrap();
}

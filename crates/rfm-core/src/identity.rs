//! Entity matching across snapshots.
//!
//! Whether two records denote the same real-world individual is a policy, not
//! structural equality. The policy is an [`IdentityStrategy`] value handed to
//! the [`IdentitySet`] container, so every lookup in the reconciler goes
//! through it.

use std::{collections::HashMap, hash::Hash};

use crate::person::Person;

// ─── Strategy ────────────────────────────────────────────────────────────────

/// Decides entity identity for records of type `T`.
///
/// `bucket` must agree with `same`: two records for which `same` holds must
/// land in the same bucket.
pub trait IdentityStrategy<T> {
  type Bucket: Eq + Hash;

  /// Coarse key used to group candidates before `same` is consulted.
  fn bucket(&self, record: &T) -> Self::Bucket;

  /// Whether `a` and `b` denote the same entity.
  fn same(&self, a: &T, b: &T) -> bool;
}

/// The registry identity rule for [`Person`].
///
/// Two persons match iff their full names are equal and the first field that
/// both carry, in the order birth date, address, registry id, is equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonIdentity;

impl IdentityStrategy<Person> for PersonIdentity {
  type Bucket = String;

  fn bucket(&self, record: &Person) -> String { record.full_name().to_string() }

  fn same(&self, a: &Person, b: &Person) -> bool {
    if a.full_name() != b.full_name() {
      return false;
    }
    tracing::trace!(?a, ?b, "comparing persons with the same name");

    if let (Some(x), Some(y)) = (a.birth_date(), b.birth_date()) {
      return x == y;
    }
    if let (Some(x), Some(y)) = (a.address(), b.address()) {
      return x == y;
    }
    a.rfm_id() == b.rfm_id()
  }
}

// ─── Container ───────────────────────────────────────────────────────────────

/// A set of records keyed by an [`IdentityStrategy`].
///
/// Iteration follows insertion order. Inserting a record identity-equal to a
/// stored one replaces the stored record in place.
#[derive(Debug, Clone)]
pub struct IdentitySet<T, S: IdentityStrategy<T>> {
  strategy: S,
  records:  Vec<T>,
  buckets:  HashMap<S::Bucket, Vec<usize>>,
}

/// A full set of persons, freshly parsed or previously persisted.
pub type Snapshot = IdentitySet<Person, PersonIdentity>;

impl<T, S: IdentityStrategy<T>> IdentitySet<T, S> {
  pub fn with_strategy(strategy: S) -> Self {
    Self {
      strategy,
      records: Vec::new(),
      buckets: HashMap::new(),
    }
  }

  pub fn strategy(&self) -> &S { &self.strategy }

  fn position(&self, probe: &T) -> Option<usize> {
    self
      .buckets
      .get(&self.strategy.bucket(probe))?
      .iter()
      .copied()
      .find(|&i| self.strategy.same(&self.records[i], probe))
  }

  /// Insert `record`. If an identity-equal record is already present it is
  /// replaced and returned.
  pub fn insert(&mut self, record: T) -> Option<T> {
    if let Some(i) = self.position(&record) {
      return Some(std::mem::replace(&mut self.records[i], record));
    }
    let bucket = self.strategy.bucket(&record);
    self.buckets.entry(bucket).or_default().push(self.records.len());
    self.records.push(record);
    None
  }

  /// The stored record identity-equal to `probe`, if any.
  pub fn get(&self, probe: &T) -> Option<&T> {
    self.position(probe).map(|i| &self.records[i])
  }

  pub fn contains(&self, probe: &T) -> bool { self.position(probe).is_some() }

  pub fn iter(&self) -> std::slice::Iter<'_, T> { self.records.iter() }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn as_slice(&self) -> &[T] { &self.records }

  pub fn into_vec(self) -> Vec<T> { self.records }
}

impl<T, S: IdentityStrategy<T> + Default> Default for IdentitySet<T, S> {
  fn default() -> Self { Self::with_strategy(S::default()) }
}

impl<T, S: IdentityStrategy<T> + Default> IdentitySet<T, S> {
  pub fn new() -> Self { Self::default() }
}

impl<T, S: IdentityStrategy<T> + Default> FromIterator<T> for IdentitySet<T, S> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut set = Self::default();
    for record in iter {
      set.insert(record);
    }
    set
  }
}

impl<'a, T, S: IdentityStrategy<T>> IntoIterator for &'a IdentitySet<T, S> {
  type IntoIter = std::slice::Iter<'a, T>;
  type Item = &'a T;

  fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
  }

  fn same(a: &Person, b: &Person) -> bool {
    let s = PersonIdentity;
    let forward = s.same(a, b);
    assert_eq!(forward, s.same(b, a), "identity must be symmetric");
    forward
  }

  #[test]
  fn different_names_never_match() {
    let a = Person::new(1, "Ivanov Ivan").with_birth_date(date(1980, 1, 1));
    let b = Person::new(1, "Ivanov Ivan Jr").with_birth_date(date(1980, 1, 1));
    assert!(!same(&a, &b));
  }

  #[test]
  fn birth_date_takes_precedence() {
    let a = Person::new(1, "X")
      .with_birth_date(date(1980, 1, 1))
      .with_address(Some("Moscow".into()));
    let b = Person::new(1, "X")
      .with_birth_date(date(1981, 1, 1))
      .with_address(Some("Moscow".into()));
    assert!(!same(&a, &b), "differing birth dates decide");

    let c = Person::new(2, "X")
      .with_birth_date(date(1980, 1, 1))
      .with_address(Some("Kazan".into()));
    assert!(same(&a, &c), "equal birth dates decide");
  }

  #[test]
  fn address_used_when_birth_date_missing_on_either_side() {
    let a = Person::new(1, "X")
      .with_birth_date(date(1980, 1, 1))
      .with_address(Some("Moscow".into()));
    let b = Person::new(2, "X").with_address(Some("Moscow".into()));
    assert!(same(&a, &b));

    let c = Person::new(1, "X").with_address(Some("Kazan".into()));
    assert!(!same(&a, &c), "address decides before rfm_id");
  }

  #[test]
  fn rfm_id_is_the_last_resort() {
    let a = Person::new(7, "X").with_address(Some("Moscow".into()));
    let b = Person::new(7, "X");
    assert!(same(&a, &b));
    assert!(!same(&a, &Person::new(8, "X")));
  }

  #[test]
  fn set_buckets_by_name_and_disambiguates() {
    let mut set = Snapshot::new();
    let first = Person::new(1, "X").with_birth_date(date(1980, 1, 1));
    let second = Person::new(2, "X").with_birth_date(date(1990, 1, 1));
    assert!(set.insert(first).is_none());
    assert!(set.insert(second).is_none());
    assert_eq!(set.len(), 2);

    let probe = Person::new(99, "X").with_birth_date(date(1990, 1, 1));
    assert_eq!(set.get(&probe).map(Person::rfm_id), Some(2));
    assert!(!set.contains(&Person::new(3, "Y")));
  }

  #[test]
  fn insert_of_identity_equal_record_replaces() {
    let mut set = Snapshot::new();
    set.insert(Person::new(1, "X").with_address(Some("old".into())));
    set.insert(Person::new(2, "Z"));
    let displaced = set.insert(Person::new(1, "X").with_terr(true));

    let displaced = displaced.expect("record with rfm_id 1 is replaced");
    assert_eq!(displaced.address(), Some("old"));
    assert_eq!(set.len(), 2);
    let names: Vec<_> = set.iter().map(Person::full_name).collect();
    assert_eq!(names, ["X", "Z"]);
    assert!(set.as_slice()[0].is_terr());
  }
}

//! SQLite backend for the RFM snapshot and change log.
//!
//! One [`SqliteStore`] owns one connection and implements both
//! [`rfm_core::store::SnapshotStore`] and [`rfm_core::store::EventStore`]
//! over the tables named in [`Tables`].

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteStore, Tables};

#[cfg(test)]
mod tests;

//! In-memory keyed collection engine for keyedstore.
//!
//! This crate applies inserts, updates, removals and best-effort batches to
//! [`KeyedCollection`]s, keeping key values unique and using a per-collection
//! existence cache to avoid repeated full scans.
//!
//! # Features
//!
//! - **Keyed mutations** - Insert, update and remove with single or composite keys
//! - **Generated keys** - Records inserted without a key get a fresh identifier
//! - **Existence cache** - Lazily built fast-reject filter in front of linear scans
//! - **Grouped views** - Batches locate the leaf collection holding a key inside nested groups
//! - **Shared access** - [`SharedCollection`] serializes concurrent callers with an async RwLock
//!
//! # Quick Start
//!
//! ```ignore
//! use keyedstore_memory::{KeyedCollection, KeyedStore};
//! use keyedstore_core::key::{KeyExpr, KeySpec, KeyValue};
//! use bson::doc;
//!
//! let store = KeyedStore::new(KeySpec::new(KeyExpr::single("id")));
//! let mut users = KeyedCollection::from_records([doc! { "id": 1, "name": "a" }]);
//!
//! store.insert(&mut users, doc! { "id": 2, "name": "b" }, None)?;
//! store.update(&mut users, &KeyValue::scalar(1), doc! { "name": "x" })?;
//! store.remove(&mut users, &KeyValue::scalar(999));
//! ```

#[allow(unused_extern_crates)]
extern crate self as keyedstore_memory;

pub mod batch;
pub mod cache;
pub mod collection;
pub mod locator;
pub mod mutate;
pub mod shared;

#[cfg(test)]
mod tests;

pub use cache::ExistenceCache;
pub use collection::{Entry, GroupNode, KeyedCollection};
pub use mutate::{KeyedStore, KeyedStoreBuilder};
pub use shared::SharedCollection;

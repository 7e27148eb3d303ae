//! Main keyedstore crate providing a unified interface for keyed collections.
//!
//! This crate is the primary entry point for users of keyedstore. It re-exports
//! the core types from `keyedstore-core` and the in-memory engine from
//! `keyedstore-memory`.
//!
//! # Features
//!
//! - **Keyed records** - BSON records identified by a single field, several fields, or themselves
//! - **Consistent mutations** - Unique keys, key-mismatch detection and idempotent removal
//! - **Best-effort batches** - Ordered batches that skip failing operations, including inside grouped views
//! - **Existence cache** - Lookups skip the scan when a key has never been seen
//!
//! # Quick Start
//!
//! ```ignore
//! use keyedstore::prelude::*;
//! use bson::doc;
//!
//! fn main() -> Result<(), MutationError> {
//!     let store = KeyedStore::new(KeySpec::new(KeyExpr::single("id")));
//!     let mut users = KeyedCollection::from_records([doc! { "id": 1, "name": "a" }]);
//!
//!     // Insert with an explicit key, and without one (a key is generated)
//!     store.insert(&mut users, doc! { "id": 2, "name": "b" }, None)?;
//!     let generated = store.insert(&mut users, doc! { "name": "c" }, None)?;
//!
//!     // Patch a record, then remove another
//!     store.update(&mut users, &generated.key, doc! { "name": "d" })?;
//!     store.remove(&mut users, &KeyValue::scalar(1));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Batches
//!
//! Batches are applied in order and never roll back. Operations that fail on
//! the data are skipped; only faults such as a missing composite key abort the
//! batch.
//!
//! ```ignore
//! use keyedstore::prelude::*;
//! use bson::doc;
//!
//! let store = KeyedStore::new(KeySpec::new(KeyExpr::single("id")));
//! let mut users = KeyedCollection::from_records([doc! { "id": 1 }]);
//!
//! let ops = Batch::builder()
//!     .insert(doc! { "id": 3 })
//!     .update(999, doc! { "name": "skipped" })
//!     .build();
//!
//! store.apply_batch(&mut users, ops, 0, false)?;
//! assert_eq!(users.len(), 2);
//! ```
//!
//! # Grouped Views
//!
//! When a collection holds [`GroupNode`](memory::GroupNode)s, pass the number
//! of grouping levels to `apply_batch` and updates and removals find the leaf
//! collection that holds their key.

pub mod prelude;

pub use keyedstore_core::{batch, error, id, key, merge, options, outcome, value};
pub use keyedstore_memory::{cache, collection, locator, mutate, shared};

// Re-export BSON types for convenience
pub use bson;

/// In-memory collection engine.
pub mod memory {
    pub use keyedstore_memory::{
        Entry, ExistenceCache, GroupNode, KeyedCollection, KeyedStore, KeyedStoreBuilder, SharedCollection,
    };
}

//! Convenient re-exports of commonly used types from keyedstore.
//!
//! ```ignore
//! use keyedstore::prelude::*;
//! ```
//!
//! This provides access to:
//! - Key expressions, key values and key comparison
//! - Collections, group nodes and the mutation store
//! - Batch construction
//! - Collaborator traits, options and error types

pub use keyedstore_core::{
    batch::{Batch, BatchBuilder, BatchOp},
    error::{MutationError, MutationResult},
    id::{IdGenerator, UuidGenerator},
    key::{KeyExpr, KeyInfo, KeySpec, KeyValue},
    merge::{DeepMerge, PatchMerge},
    options::StoreOptions,
    outcome::{Inserted, Updated},
};
pub use keyedstore_memory::{
    collection::{Entry, GroupNode, KeyedCollection},
    mutate::{KeyedStore, KeyedStoreBuilder},
    shared::SharedCollection,
};

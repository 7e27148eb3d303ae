//! Batch operation descriptions.
//!
//! A batch is an ordered list of [`BatchOp`]s applied best-effort: each
//! operation stands on its own and a failing one is skipped.
//!
//! ```ignore
//! use keyedstore::batch::{Batch, BatchOp};
//! use bson::doc;
//!
//! let ops = Batch::builder()
//!     .insert(doc! { "id": 3 })
//!     .update(999, doc! { "name": "x" })
//!     .remove(1)
//!     .build();
//! ```

use bson::Document;

use crate::key::KeyValue;

/// A single operation inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Inserts a record into the top-level collection.
    Insert {
        /// The record to insert.
        data: Document,
        /// Position to insert at; honored only when the batch enables insert indexes.
        index: Option<usize>,
    },
    /// Merges a patch into the record with the given key.
    Update {
        /// The key of the record to update.
        key: KeyValue,
        /// The patch to merge.
        data: Document,
    },
    /// Removes the record with the given key.
    Remove {
        /// The key of the record to remove.
        key: KeyValue,
    },
}

impl BatchOp {
    /// Creates an append operation.
    pub fn insert(data: Document) -> Self {
        BatchOp::Insert { data, index: None }
    }

    /// Creates an insert operation at a given position.
    pub fn insert_at(data: Document, index: usize) -> Self {
        BatchOp::Insert { data, index: Some(index) }
    }

    /// Creates an update operation.
    pub fn update(key: impl Into<KeyValue>, data: Document) -> Self {
        BatchOp::Update { key: key.into(), data }
    }

    /// Creates a remove operation.
    pub fn remove(key: impl Into<KeyValue>) -> Self {
        BatchOp::Remove { key: key.into() }
    }

    /// Returns the operation name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            BatchOp::Insert { .. } => "insert",
            BatchOp::Update { .. } => "update",
            BatchOp::Remove { .. } => "remove",
        }
    }
}

/// Entry point for building batches fluently.
pub struct Batch;

impl Batch {
    /// Creates a new batch builder.
    pub fn builder() -> BatchBuilder {
        BatchBuilder::new()
    }
}

/// Fluent builder for an ordered list of [`BatchOp`]s.
#[derive(Debug, Clone, Default)]
pub struct BatchBuilder {
    ops: Vec<BatchOp>,
}

impl BatchBuilder {
    /// Creates an empty batch builder.
    pub fn new() -> Self {
        BatchBuilder { ops: Vec::new() }
    }

    /// Appends an insert operation.
    pub fn insert(mut self, data: Document) -> Self {
        self.ops.push(BatchOp::insert(data));
        self
    }

    /// Appends an insert operation at a given position.
    pub fn insert_at(mut self, data: Document, index: usize) -> Self {
        self.ops.push(BatchOp::insert_at(data, index));
        self
    }

    /// Appends an update operation.
    pub fn update(mut self, key: impl Into<KeyValue>, data: Document) -> Self {
        self.ops.push(BatchOp::update(key, data));
        self
    }

    /// Appends a remove operation.
    pub fn remove(mut self, key: impl Into<KeyValue>) -> Self {
        self.ops.push(BatchOp::remove(key));
        self
    }

    /// Builds and returns the operations in the order they were added.
    pub fn build(self) -> Vec<BatchOp> {
        self.ops
    }
}

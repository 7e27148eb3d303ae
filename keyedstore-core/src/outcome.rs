//! Success payloads of single (non-batch) operations.

use bson::Document;

use crate::key::KeyValue;

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Inserted {
    /// The stored record, or the caller's original data under the legacy output shape.
    pub record: Document,
    /// The key of the inserted record, generated if the data carried none.
    pub key: KeyValue,
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq)]
pub enum Updated {
    /// The record after the merge, and the key it was found by.
    Current {
        record: Document,
        key: KeyValue,
    },
    /// Legacy output shape: the key and the patch as passed in.
    Legacy {
        key: KeyValue,
        data: Document,
    },
}

impl Updated {
    /// Returns the key the update was issued for.
    pub fn key(&self) -> &KeyValue {
        match self {
            Updated::Current { key, .. } | Updated::Legacy { key, .. } => key,
        }
    }
}

//! Error types and result types for keyed collection mutations.
//!
//! Every error kind carries a stable code (see [`MutationError::code`]); callers
//! should match on the variant or the code rather than on the rendered message.

use thiserror::Error;

/// Represents all possible errors that can occur when mutating a keyed collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// An update patch carries key fields whose value differs from the key being updated.
    /// The argument is the canonical form of the key passed to the update.
    #[error("The key field of record {0} cannot be modified")]
    KeyMismatch(String),
    /// The record targeted by an update does not exist in the collection.
    #[error("The record with key {0} was not found")]
    KeyNotFound(String),
    /// A record with the same key already exists in the collection.
    #[error("A record with key {0} already exists")]
    DuplicateKey(String),
    /// An insert omitted the key value while the key expression is composite.
    /// The argument lists the composite key fields.
    #[error("A key cannot be generated for the composite key {0:?}")]
    UnsupportedAutoKey(Vec<String>),
}

impl MutationError {
    /// Returns the stable code identifying this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            MutationError::KeyMismatch(_) => "E4017",
            MutationError::KeyNotFound(_) => "E4009",
            MutationError::DuplicateKey(_) => "E4008",
            MutationError::UnsupportedAutoKey(_) => "E4007",
        }
    }

    /// Returns `true` for errors caused by a caller or schema defect rather than
    /// by the data in the collection.
    ///
    /// Faults are never absorbed by batch application.
    pub fn is_fault(&self) -> bool {
        matches!(self, MutationError::UnsupportedAutoKey(_))
    }
}

/// A specialized `Result` type for keyed collection operations.
pub type MutationResult<T> = Result<T, MutationError>;

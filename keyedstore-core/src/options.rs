//! Store configuration.
//!
//! Options are plain data so hosts can load them from their own configuration
//! sources:
//!
//! ```ignore
//! use keyedstore::options::StoreOptions;
//!
//! let options = StoreOptions::from_json_str(r#"{ "legacyStoreResult": true }"#)?;
//! assert!(options.legacy_store_result);
//! ```

use serde::{Deserialize, Serialize};

/// Options controlling the output of single (non-batch) operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreOptions {
    /// Selects the legacy output shape.
    ///
    /// Inserts then return the caller's original data instead of the stored
    /// record, and updates return `(key, patch)` instead of `(record, key)`.
    pub legacy_store_result: bool,
}

impl StoreOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the legacy output shape flag.
    pub fn with_legacy_store_result(mut self, legacy: bool) -> Self {
        self.legacy_store_result = legacy;
        self
    }

    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

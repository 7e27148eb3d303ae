//! Structural patch merging.
//!
//! Updates never replace a record wholesale: the patch is merged into the stored
//! record through a [`PatchMerge`] implementation. [`DeepMerge`] is the default.

use bson::{Bson, Document};

/// Merges a patch into a target record in place.
pub trait PatchMerge: Send + Sync {
    /// Applies `patch` to `target`.
    fn merge(&self, target: &mut Document, patch: &Document);
}

/// Recursive field-by-field merge.
///
/// Nested documents are merged into existing nested documents; arrays and
/// scalars replace the target value. `Undefined` patch values are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepMerge;

impl PatchMerge for DeepMerge {
    fn merge(&self, target: &mut Document, patch: &Document) {
        for (field, value) in patch {
            match (target.get_mut(field), value) {
                (_, Bson::Undefined) => {},
                (Some(Bson::Document(existing)), Bson::Document(nested)) => {
                    self.merge(existing, nested);
                },
                _ => {
                    target.insert(field.clone(), value.clone());
                },
            }
        }
    }
}

//! Best-effort batch application.

use tracing::debug;

use keyedstore_core::{
    batch::BatchOp,
    error::MutationResult,
    key::KeyInfo,
};

use crate::{
    collection::KeyedCollection,
    locator,
    mutate::KeyedStore,
};

impl<K: KeyInfo> KeyedStore<K> {
    /// Applies `ops` in order.
    ///
    /// Inserts always target `collection` itself. Updates and removals target
    /// the collection `group_depth` levels down that holds their key, and are
    /// skipped when there is none. Insert indexes are honored only when
    /// `use_insert_index` is set; otherwise records are appended.
    ///
    /// Operations that fail on the data (duplicate key, missing key, key
    /// mismatch) are skipped and the batch continues. Nothing is rolled back.
    ///
    /// # Errors
    ///
    /// Returns the first fault ([`MutationError::UnsupportedAutoKey`]); the
    /// operations before it stay applied and the rest are not attempted.
    ///
    /// [`MutationError::UnsupportedAutoKey`]: keyedstore_core::error::MutationError::UnsupportedAutoKey
    pub fn apply_batch(
        &self,
        collection: &mut KeyedCollection,
        ops: impl IntoIterator<Item = BatchOp>,
        group_depth: usize,
        use_insert_index: bool,
    ) -> MutationResult<()> {
        for (position, op) in ops.into_iter().enumerate() {
            let kind = op.kind();

            let result = match op {
                BatchOp::Insert { data, index } => {
                    collection.ensure_cache(self.key_info());

                    self.insert_record(
                        collection,
                        &data,
                        index.filter(|_| use_insert_index),
                    ).map(|_| ())
                },
                BatchOp::Update { key, data } => {
                    match locator::resolve_target(self.key_info(), collection, &key, group_depth) {
                        Some(target) => {
                            target.ensure_cache(self.key_info());
                            self.update_record(target, &key, &data).map(|_| ())
                        },
                        None => {
                            debug!(position, key = %key, "no collection holds key, skipping update");
                            Ok(())
                        },
                    }
                },
                BatchOp::Remove { key } => {
                    if let Some(target) = locator::resolve_target(self.key_info(), collection, &key, group_depth) {
                        target.ensure_cache(self.key_info());
                        self.remove_record(target, &key);
                    }

                    Ok(())
                },
            };

            match result {
                Err(err) if err.is_fault() => return Err(err),
                Err(err) => {
                    debug!(position, op = kind, error = %err, code = err.code(), "skipping batch operation");
                },
                Ok(()) => {},
            }
        }

        Ok(())
    }
}

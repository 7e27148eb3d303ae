//! Single-record mutations.
//!
//! [`KeyedStore`] binds a key spec to its collaborators (identifier generator,
//! patch merger and options) and applies inserts, updates and removals to any
//! [`KeyedCollection`] it is handed.

use std::fmt;
use bson::Document;
use tracing::debug;

use keyedstore_core::{
    error::{MutationError, MutationResult},
    id::{IdGenerator, UuidGenerator},
    key::{KeyExpr, KeyInfo, KeySpec, KeyValue},
    merge::{DeepMerge, PatchMerge},
    options::StoreOptions,
    outcome::{Inserted, Updated},
};

use crate::{
    collection::{Entry, KeyedCollection},
    locator,
};


/// Applies keyed mutations to collections.
///
/// # Example
///
/// ```ignore
/// use keyedstore::prelude::*;
/// use bson::doc;
///
/// let store = KeyedStore::new(KeySpec::new(KeyExpr::single("id")));
/// let mut collection = KeyedCollection::from_records([doc! { "id": 1, "name": "a" }]);
///
/// let inserted = store.insert(&mut collection, doc! { "name": "c" }, None)?;
/// store.update(&mut collection, &inserted.key, doc! { "name": "d" })?;
/// store.remove(&mut collection, &KeyValue::scalar(1));
/// ```
pub struct KeyedStore<K = KeySpec> {
    key_info: K,
    id_generator: Box<dyn IdGenerator>,
    merger: Box<dyn PatchMerge>,
    options: StoreOptions,
}

impl<K: KeyInfo> KeyedStore<K> {
    /// Creates a store with the default collaborators and options.
    pub fn new(key_info: K) -> Self {
        Self::builder(key_info).build()
    }

    /// Creates a builder for a store with custom collaborators or options.
    pub fn builder(key_info: K) -> KeyedStoreBuilder<K> {
        KeyedStoreBuilder::new(key_info)
    }

    /// Returns the key info this store uses.
    pub fn key_info(&self) -> &K {
        &self.key_info
    }

    /// Returns the store options.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Returns the position of the record with the given key.
    pub fn index_by_key(&self, collection: &KeyedCollection, key: &KeyValue) -> Option<usize> {
        locator::index_by_key(&self.key_info, collection, key)
    }

    /// Inserts a copy of `data` at `index`, or appends it when `index` is `None`.
    ///
    /// When the data carries no key value, a fresh identifier is generated and
    /// written to the key field.
    ///
    /// # Errors
    ///
    /// - [`MutationError::DuplicateKey`] if the key is already present.
    /// - [`MutationError::UnsupportedAutoKey`] if the key is missing and the key
    ///   expression is composite.
    pub fn insert(
        &self,
        collection: &mut KeyedCollection,
        data: Document,
        index: Option<usize>,
    ) -> MutationResult<Inserted> {
        let (record, key) = self.insert_record(collection, &data, index)?;

        Ok(
            Inserted {
                record: if self.options.legacy_store_result { data } else { record },
                key,
            }
        )
    }

    /// Merges `patch` into the record identified by `key`.
    ///
    /// # Errors
    ///
    /// - [`MutationError::KeyMismatch`] if the patch carries key fields that
    ///   disagree with `key`. The collection is left untouched.
    /// - [`MutationError::KeyNotFound`] if no record has the given key.
    pub fn update(
        &self,
        collection: &mut KeyedCollection,
        key: &KeyValue,
        patch: Document,
    ) -> MutationResult<Updated> {
        let record = self.update_record(collection, key, &patch)?;

        Ok(
            if self.options.legacy_store_result {
                Updated::Legacy { key: key.clone(), data: patch }
            } else {
                Updated::Current { record, key: key.clone() }
            }
        )
    }

    /// Removes the record identified by `key`, if present.
    ///
    /// Removing a missing key is not an error. Returns the key as confirmation.
    pub fn remove(&self, collection: &mut KeyedCollection, key: &KeyValue) -> KeyValue {
        self.remove_record(collection, key);

        key.clone()
    }

    pub(crate) fn insert_record(
        &self,
        collection: &mut KeyedCollection,
        data: &Document,
        index: Option<usize>,
    ) -> MutationResult<(Document, KeyValue)> {
        let mut record = data.clone();

        let key = match self.key_info.key() {
            KeyExpr::None => KeyValue::Record(record.clone()),
            expr => match self.key_info.key_of(&record) {
                Some(key) if !key.is_absent() => {
                    if locator::index_by_key(&self.key_info, collection, &key).is_some() {
                        return Err(MutationError::DuplicateKey(key.canonical()));
                    }

                    key
                },
                _ => self.generate_key(expr, &mut record)?,
            },
        };

        let position = collection.insert_entry(Entry::Record(record.clone()), index);
        collection.mark_present(&self.key_info, &key);

        debug!(key = %key, position, "inserted record");

        Ok((record, key))
    }

    fn generate_key(&self, expr: &KeyExpr, record: &mut Document) -> MutationResult<KeyValue> {
        match expr {
            KeyExpr::Single(field) => {
                let id = self.id_generator.new_id();
                record.insert(field.clone(), id.clone());

                Ok(KeyValue::Scalar(id))
            },
            KeyExpr::Composite(fields) => Err(MutationError::UnsupportedAutoKey(fields.clone())),
            KeyExpr::None => Ok(KeyValue::Record(record.clone())),
        }
    }

    pub(crate) fn update_record(
        &self,
        collection: &mut KeyedCollection,
        key: &KeyValue,
        patch: &Document,
    ) -> MutationResult<Document> {
        let expr = self.key_info.key();

        if !expr.is_defined() {
            return Ok(self.update_by_record(collection, key, patch));
        }

        if expr.is_present_in(patch) {
            let matches = self
                .key_info
                .key_of(patch)
                .is_some_and(|patch_key| self.key_info.equal(key, &patch_key));

            if !matches {
                return Err(MutationError::KeyMismatch(key.canonical()));
            }
        }

        let target = locator::index_by_key(&self.key_info, collection, key)
            .and_then(|index| collection.entry_mut(index))
            .ok_or_else(|| MutationError::KeyNotFound(key.canonical()))?;

        self.merger.merge(target.fields_mut(), patch);
        debug!(key = %key, "updated record");

        Ok(target.fields().clone())
    }

    /// Without a key expression the key is the record itself: the matching
    /// entry is patched, or a detached copy of the key when nothing matches.
    fn update_by_record(
        &self,
        collection: &mut KeyedCollection,
        key: &KeyValue,
        patch: &Document,
    ) -> Document {
        let target = locator::index_by_key(&self.key_info, collection, key)
            .and_then(|index| collection.entry_mut(index));

        match target {
            Some(entry) => {
                self.merger.merge(entry.fields_mut(), patch);
                debug!("updated record");

                entry.fields().clone()
            },
            None => {
                let mut detached = match key.clone().into_bson() {
                    bson::Bson::Document(doc) => doc,
                    _ => Document::new(),
                };
                self.merger.merge(&mut detached, patch);

                detached
            },
        }
    }

    pub(crate) fn remove_record(&self, collection: &mut KeyedCollection, key: &KeyValue) -> bool {
        match locator::index_by_key(&self.key_info, collection, key) {
            Some(index) => {
                collection.remove_entry(index);
                debug!(key = %key, index, "removed record");

                true
            },
            None => false,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for KeyedStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedStore")
            .field("key_info", &self.key_info)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}


/// Builder for constructing [`KeyedStore`] instances.
///
/// # Example
///
/// ```ignore
/// use keyedstore::prelude::*;
///
/// let store = KeyedStore::builder(KeySpec::new(KeyExpr::single("id")))
///     .options(StoreOptions::new().with_legacy_store_result(true))
///     .id_generator(UuidGenerator)
///     .build();
/// ```
pub struct KeyedStoreBuilder<K = KeySpec> {
    key_info: K,
    id_generator: Box<dyn IdGenerator>,
    merger: Box<dyn PatchMerge>,
    options: StoreOptions,
}

impl<K: KeyInfo> KeyedStoreBuilder<K> {
    /// Creates a builder with the default collaborators and options.
    pub fn new(key_info: K) -> Self {
        Self {
            key_info,
            id_generator: Box::new(UuidGenerator),
            merger: Box::new(DeepMerge),
            options: StoreOptions::default(),
        }
    }

    /// Sets the store options.
    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the generator used for records inserted without a key value.
    pub fn id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Box::new(generator);
        self
    }

    /// Sets the merger used to apply update patches.
    pub fn merger(mut self, merger: impl PatchMerge + 'static) -> Self {
        self.merger = Box::new(merger);
        self
    }

    /// Builds and returns the store.
    pub fn build(self) -> KeyedStore<K> {
        KeyedStore {
            key_info: self.key_info,
            id_generator: self.id_generator,
            merger: self.merger,
            options: self.options,
        }
    }
}

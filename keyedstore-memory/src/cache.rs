//! Existence cache.
//!
//! The cache is a fast-reject filter: a miss proves a key is absent, a hit only
//! means the collection has to be scanned. Entries are added on build and on
//! every insert, and never removed, so keys removed from the collection still
//! report a (stale) hit.

use std::collections::HashSet;
use keyedstore_core::key::{KeyInfo, KeyValue};
use tracing::trace;

use crate::collection::KeyedCollection;

/// Set of canonical key serializations seen in one collection.
#[derive(Debug, Clone, Default)]
pub struct ExistenceCache {
    seen: HashSet<String>,
}

impl ExistenceCache {
    fn build<K: KeyInfo + ?Sized>(key_info: &K, collection: &KeyedCollection) -> Self {
        let seen = collection
            .records()
            .filter_map(|record| key_info.key_of(record))
            .map(|key| key_info.canonical(&key))
            .collect::<HashSet<_>>();

        Self { seen }
    }

    fn contains<K: KeyInfo + ?Sized>(&self, key_info: &K, key: &KeyValue) -> bool {
        self.seen.contains(&key_info.canonical(key))
    }

    fn insert<K: KeyInfo + ?Sized>(&mut self, key_info: &K, key: &KeyValue) {
        self.seen.insert(key_info.canonical(key));
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl KeyedCollection {
    /// Builds and attaches the existence cache if the key is defined and no
    /// cache is attached yet. Scans the whole collection once.
    pub fn ensure_cache<K: KeyInfo + ?Sized>(&mut self, key_info: &K) {
        if !key_info.key().is_defined() || self.cache.is_some() {
            return;
        }

        let cache = ExistenceCache::build(key_info, self);
        trace!(entries = self.len(), keys = cache.len(), "built existence cache");

        self.cache = Some(cache);
    }

    /// Returns `false` only when the attached cache proves `key` was never seen.
    /// Without a cache this is always `true`.
    pub fn may_contain<K: KeyInfo + ?Sized>(&self, key_info: &K, key: &KeyValue) -> bool {
        match &self.cache {
            Some(cache) => cache.contains(key_info, key),
            None => true,
        }
    }

    /// Records `key` in the attached cache, if any.
    pub fn mark_present<K: KeyInfo + ?Sized>(&mut self, key_info: &K, key: &KeyValue) {
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(key_info, key);
        }
    }

    /// Returns the attached cache.
    pub fn cache(&self) -> Option<&ExistenceCache> {
        self.cache.as_ref()
    }
}

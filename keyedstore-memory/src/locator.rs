//! Key lookup and target resolution inside grouped collections.

use keyedstore_core::key::{KeyInfo, KeyValue};
use tracing::trace;

use crate::collection::KeyedCollection;

/// Returns the position of the first entry whose key equals `key`.
///
/// The existence cache is consulted first; a cache miss returns `None` without
/// scanning. Otherwise the collection is scanned linearly.
pub fn index_by_key<K: KeyInfo + ?Sized>(
    key_info: &K,
    collection: &KeyedCollection,
    key: &KeyValue,
) -> Option<usize> {
    if !collection.may_contain(key_info, key) {
        trace!(key = %key, "existence cache rejected key");
        return None;
    }

    collection
        .records()
        .position(|record| {
            key_info
                .key_of(record)
                .is_some_and(|candidate| key_info.equal(&candidate, key))
        })
}

/// Finds the collection that directly contains `key`, `group_depth` levels
/// below `root`.
///
/// With a depth of zero the root itself is the target, whether or not it holds
/// the key. Otherwise each group's children (`items`, falling back to
/// `collapsed_items`) are searched depth-first and the first bottom-level
/// collection containing the key is returned. Returns `None` when no such
/// collection exists.
pub fn resolve_target<'c, K: KeyInfo + ?Sized>(
    key_info: &K,
    root: &'c mut KeyedCollection,
    key: &KeyValue,
    group_depth: usize,
) -> Option<&'c mut KeyedCollection> {
    if group_depth == 0 {
        return Some(root);
    }

    let mut path = Vec::with_capacity(group_depth);
    if !find_path(key_info, root, key, group_depth, &mut path) {
        return None;
    }

    path
        .into_iter()
        .try_fold(root, |collection, index| {
            collection
                .entry_mut(index)?
                .as_group_mut()?
                .children_mut()
        })
}

/// Same search as [`resolve_target`], without mutable access.
pub fn find_target<'c, K: KeyInfo + ?Sized>(
    key_info: &K,
    root: &'c KeyedCollection,
    key: &KeyValue,
    group_depth: usize,
) -> Option<&'c KeyedCollection> {
    let mut path = Vec::with_capacity(group_depth);
    if group_depth > 0 && !find_path(key_info, root, key, group_depth, &mut path) {
        return None;
    }

    path
        .into_iter()
        .try_fold(root, |collection, index| {
            collection
                .get(index)?
                .as_group()?
                .children()
        })
}

/// Records in `path` the entry indexes leading to the bottom-level collection
/// that contains `key`.
fn find_path<K: KeyInfo + ?Sized>(
    key_info: &K,
    collection: &KeyedCollection,
    key: &KeyValue,
    depth: usize,
    path: &mut Vec<usize>,
) -> bool {
    if depth == 0 {
        return index_by_key(key_info, collection, key).is_some();
    }

    for (index, entry) in collection.entries().iter().enumerate() {
        let Some(children) = entry
            .as_group()
            .and_then(|group| group.children())
        else {
            continue;
        };

        path.push(index);
        if find_path(key_info, children, key, depth - 1, path) {
            return true;
        }
        path.pop();
    }

    false
}

//! Shared access to a keyed collection.
//!
//! The mutation engine needs exclusive access to a collection for the duration
//! of an operation. [`SharedCollection`] provides that for concurrent callers by
//! serializing access with an async-aware read-write lock.

use std::sync::Arc;
use bson::Document;
use mea::rwlock::RwLock;

use keyedstore_core::{
    batch::BatchOp,
    error::MutationResult,
    key::{KeyInfo, KeySpec, KeyValue},
    outcome::{Inserted, Updated},
};

use crate::{
    collection::KeyedCollection,
    mutate::KeyedStore,
};


/// A keyed collection shared between async tasks.
///
/// Clones share the same collection and store. Lookups take the read lock;
/// mutations and whole batches take the write lock.
///
/// # Example
///
/// ```ignore
/// use keyedstore::prelude::*;
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), MutationError> {
///     let store = KeyedStore::new(KeySpec::new(KeyExpr::single("id")));
///     let users = SharedCollection::new(store, KeyedCollection::new());
///
///     let inserted = users.insert(doc! { "name": "Alice" }, None).await?;
///     assert_eq!(users.index_by_key(&inserted.key).await, Some(0));
///
///     Ok(())
/// }
/// ```
pub struct SharedCollection<K = KeySpec> {
    store: Arc<KeyedStore<K>>,
    collection: Arc<RwLock<KeyedCollection>>,
}

impl<K> Clone for SharedCollection<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: Arc::clone(&self.collection),
        }
    }
}

impl<K: KeyInfo> SharedCollection<K> {
    /// Wraps `collection` for shared use with `store`.
    pub fn new(store: KeyedStore<K>, collection: KeyedCollection) -> Self {
        Self {
            store: Arc::new(store),
            collection: Arc::new(RwLock::new(collection)),
        }
    }

    /// Returns the store applying the mutations.
    pub fn store(&self) -> &KeyedStore<K> {
        &self.store
    }

    pub async fn len(&self) -> usize {
        self.collection
            .read()
            .await
            .len()
    }

    pub async fn is_empty(&self) -> bool {
        self.collection
            .read()
            .await
            .is_empty()
    }

    /// Returns a copy of the current collection, cache included.
    pub async fn snapshot(&self) -> KeyedCollection {
        self.collection
            .read()
            .await
            .clone()
    }

    /// Returns the position of the record with the given key.
    pub async fn index_by_key(&self, key: &KeyValue) -> Option<usize> {
        let collection = self.collection.read().await;

        self.store.index_by_key(&collection, key)
    }

    /// Returns a copy of the record with the given key.
    pub async fn get(&self, key: &KeyValue) -> Option<Document> {
        let collection = self.collection.read().await;

        self.store
            .index_by_key(&collection, key)
            .and_then(|index| collection.get(index))
            .map(|entry| entry.fields().clone())
    }

    /// See [`KeyedStore::insert`].
    pub async fn insert(&self, data: Document, index: Option<usize>) -> MutationResult<Inserted> {
        let mut collection = self.collection.write().await;

        self.store.insert(&mut collection, data, index)
    }

    /// See [`KeyedStore::update`].
    pub async fn update(&self, key: &KeyValue, patch: Document) -> MutationResult<Updated> {
        let mut collection = self.collection.write().await;

        self.store.update(&mut collection, key, patch)
    }

    /// See [`KeyedStore::remove`].
    pub async fn remove(&self, key: &KeyValue) -> KeyValue {
        let mut collection = self.collection.write().await;

        self.store.remove(&mut collection, key)
    }

    /// See [`KeyedStore::apply_batch`]. The write lock is held for the whole batch.
    pub async fn apply_batch(
        &self,
        ops: Vec<BatchOp>,
        group_depth: usize,
        use_insert_index: bool,
    ) -> MutationResult<()> {
        let mut collection = self.collection.write().await;

        self.store.apply_batch(&mut collection, ops, group_depth, use_insert_index)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use futures::{executor::block_on, future::join_all};
    use keyedstore_core::key::KeyExpr;

    fn shared() -> SharedCollection {
        SharedCollection::new(
            KeyedStore::new(KeySpec::new(KeyExpr::single("id"))),
            KeyedCollection::from_records([doc! { "id": 1, "name": "a" }]),
        )
    }

    #[test]
    fn clones_share_the_collection() {
        block_on(async {
            let users = shared();
            let other = users.clone();

            other.insert(doc! { "id": 2 }, None).await.unwrap();

            assert_eq!(users.len().await, 2);
            assert_eq!(users.get(&KeyValue::scalar(2)).await, Some(doc! { "id": 2 }));
        });
    }

    #[test]
    fn concurrent_inserts_generate_distinct_keys() {
        block_on(async {
            let users = shared();

            let results = join_all(
                (0..50).map(|_| {
                    let users = users.clone();
                    async move { users.insert(doc! { "name": "x" }, None).await }
                })
            ).await;

            assert!(results.iter().all(Result::is_ok));
            assert_eq!(users.len().await, 51);

            for inserted in results.into_iter().flatten() {
                assert!(users.index_by_key(&inserted.key).await.is_some());
            }
        });
    }

    #[test]
    fn mutations_go_through_the_store() {
        block_on(async {
            let users = shared();

            users.update(&KeyValue::scalar(1), doc! { "name": "x" }).await.unwrap();
            assert_eq!(users.get(&KeyValue::scalar(1)).await, Some(doc! { "id": 1, "name": "x" }));

            users
                .apply_batch(vec![BatchOp::insert(doc! { "id": 3 }), BatchOp::remove(1)], 0, false)
                .await
                .unwrap();
            assert_eq!(users.remove(&KeyValue::scalar(99)).await, KeyValue::scalar(99));

            let snapshot = users.snapshot().await;
            assert_eq!(snapshot, KeyedCollection::from_records([doc! { "id": 3 }]));
            assert!(snapshot.has_cache());
        });
    }
}

use std::collections::HashSet;
use futures::executor::block_on;
use keyedstore::{bson::doc, prelude::*};

fn store() -> KeyedStore {
    KeyedStore::new(KeySpec::new(KeyExpr::single("id")))
}

fn collection() -> KeyedCollection {
    KeyedCollection::from_records([doc! { "id": 1, "name": "a" }])
}

#[test]
fn insert_with_explicit_key() {
    let store = store();
    let mut collection = collection();

    let inserted = store
        .insert(&mut collection, doc! { "id": 2, "name": "b" }, None)
        .unwrap();

    assert_eq!(inserted.key, KeyValue::scalar(2));
    assert_eq!(
        collection,
        KeyedCollection::from_records([doc! { "id": 1, "name": "a" }, doc! { "id": 2, "name": "b" }]),
    );
    assert_eq!(store.index_by_key(&collection, &inserted.key), Some(1));
}

#[test]
fn insert_without_key_generates_unused_ids() {
    let store = store();
    let mut collection = collection();

    let generated = (0..3)
        .map(|_| {
            store
                .insert(&mut collection, doc! { "name": "c" }, None)
                .unwrap()
                .key
                .canonical()
        })
        .collect::<HashSet<_>>();

    assert_eq!(generated.len(), 3);
    assert!(!generated.contains(&KeyValue::scalar(1).canonical()));
    assert_eq!(collection.len(), 4);
}

#[test]
fn update_patches_the_record() {
    let store = store();
    let mut collection = collection();

    store
        .update(&mut collection, &KeyValue::scalar(1), doc! { "name": "x" })
        .unwrap();

    assert_eq!(collection.get(0).unwrap().fields(), &doc! { "id": 1, "name": "x" });
}

#[test]
fn update_cannot_change_the_key() {
    let store = store();
    let mut collection = collection();

    let err = store
        .update(&mut collection, &KeyValue::scalar(1), doc! { "id": 5, "name": "y" })
        .unwrap_err();

    assert!(matches!(err, MutationError::KeyMismatch(_)));
    assert_eq!(collection, self::collection());
}

#[test]
fn remove_of_a_missing_key_confirms_and_changes_nothing() {
    let store = store();
    let mut collection = KeyedCollection::from_records([doc! { "id": 1 }]);

    let confirmed = store.remove(&mut collection, &KeyValue::scalar(999));

    assert_eq!(confirmed, KeyValue::scalar(999));
    assert_eq!(collection, KeyedCollection::from_records([doc! { "id": 1 }]));
}

#[test]
fn batch_skips_updates_of_missing_keys() {
    let store = store();
    let mut collection = collection();

    store
        .apply_batch(
            &mut collection,
            Batch::builder()
                .insert(doc! { "id": 3 })
                .update(999, doc! {})
                .build(),
            0,
            false,
        )
        .unwrap();

    assert!(store.index_by_key(&collection, &KeyValue::scalar(3)).is_some());
    assert_eq!(collection.len(), 2);
}

#[test]
fn composite_keys_are_never_generated() {
    let store = KeyedStore::new(KeySpec::new(KeyExpr::composite(["region", "code"])));

    let mut single = KeyedCollection::new();
    let err = store.insert(&mut single, doc! { "name": "x" }, None).unwrap_err();
    assert_eq!(err.code(), "E4007");

    let mut batched = KeyedCollection::new();
    let err = store
        .apply_batch(&mut batched, [BatchOp::insert(doc! { "name": "x" })], 0, false)
        .unwrap_err();
    assert!(err.is_fault());
    assert!(batched.is_empty());
}

#[test]
fn composite_keys_identify_records() {
    let store = KeyedStore::new(KeySpec::new(KeyExpr::composite(["region", "code"])));
    let mut collection = KeyedCollection::new();

    store
        .insert(&mut collection, doc! { "region": "eu", "code": 1, "v": 0 }, None)
        .unwrap();
    store
        .insert(&mut collection, doc! { "region": "us", "code": 1, "v": 0 }, None)
        .unwrap();
    let err = store
        .insert(&mut collection, doc! { "code": 1, "region": "eu" }, None)
        .unwrap_err();
    assert_eq!(err.code(), "E4008");

    let key = KeyValue::composite([("region", "us"), ("code", "1")]);
    assert_eq!(store.index_by_key(&collection, &key), None);

    let key = KeyValue::composite([
        ("region", keyedstore::bson::Bson::from("us")),
        ("code", keyedstore::bson::Bson::from(1)),
    ]);
    assert_eq!(store.index_by_key(&collection, &key), Some(1));

    store.remove(&mut collection, &key);
    assert_eq!(collection.len(), 1);
}

#[test]
fn batch_with_one_bad_operation_applies_the_rest() {
    let store = store();
    let mut collection = KeyedCollection::from_records([doc! { "id": 1 }, doc! { "id": 2 }]);

    store
        .apply_batch(
            &mut collection,
            Batch::builder()
                .update(1, doc! { "seen": true })
                .update(404, doc! { "seen": true })
                .update(2, doc! { "seen": true })
                .insert(doc! { "id": 3 })
                .build(),
            0,
            false,
        )
        .unwrap();

    assert_eq!(
        collection,
        KeyedCollection::from_records([
            doc! { "id": 1, "seen": true },
            doc! { "id": 2, "seen": true },
            doc! { "id": 3 },
        ]),
    );
}

#[test]
fn grouped_batches_reach_nested_records() {
    let store = store();
    let mut collection = KeyedCollection::from_entries([
        GroupNode::new(
            doc! { "key": "open" },
            KeyedCollection::from_records([doc! { "id": 1, "state": "open" }]),
        ),
        GroupNode::collapsed(
            doc! { "key": "closed" },
            KeyedCollection::from_records([doc! { "id": 2, "state": "closed" }]),
        ),
    ]);

    store
        .apply_batch(
            &mut collection,
            Batch::builder()
                .update(2, doc! { "state": "archived" })
                .remove(1)
                .build(),
            1,
            false,
        )
        .unwrap();

    let open = collection.get(0).and_then(Entry::as_group).and_then(GroupNode::children).unwrap();
    let closed = collection.get(1).and_then(Entry::as_group).and_then(GroupNode::children).unwrap();

    assert!(open.is_empty());
    assert_eq!(closed.get(0).unwrap().fields(), &doc! { "id": 2, "state": "archived" });
}

#[test]
fn options_load_from_json() {
    let options = StoreOptions::from_json_str(r#"{ "legacyStoreResult": true }"#).unwrap();
    let store = KeyedStore::builder(KeySpec::new(KeyExpr::single("id")))
        .options(options)
        .build();
    let mut collection = collection();

    let inserted = store.insert(&mut collection, doc! { "name": "n" }, None).unwrap();

    assert_eq!(inserted.record, doc! { "name": "n" });
    assert!(store.options().legacy_store_result);
}

#[test]
fn shared_collection_serializes_callers() {
    block_on(async {
        let users = SharedCollection::new(store(), collection());

        users.insert(doc! { "id": 2 }, None).await.unwrap();
        users.update(&KeyValue::scalar(2), doc! { "name": "b" }).await.unwrap();

        assert_eq!(users.get(&KeyValue::scalar(2)).await, Some(doc! { "id": 2, "name": "b" }));
        assert_eq!(users.len().await, 2);
    });
}

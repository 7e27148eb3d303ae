use std::collections::HashSet;
use bson::{Bson, doc};
use keyedstore_core::key::{KeyExpr, KeyInfo, KeySpec, KeyValue};
use proptest::prelude::*;

use crate::{KeyedCollection, KeyedStore};

#[derive(Clone, Debug)]
enum Step {
    Insert(i64),
    InsertKeyless,
    Remove(i64),
    Lookup(i64),
}

fn arb_key_value() -> impl Strategy<Value = i64> {
    0_i64..16
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_key_value().prop_map(Step::Insert),
        Just(Step::InsertKeyless),
        arb_key_value().prop_map(Step::Remove),
        arb_key_value().prop_map(Step::Lookup),
    ]
}

/// Lookup without the cache: a plain linear scan.
fn scan(spec: &KeySpec, collection: &KeyedCollection, key: &KeyValue) -> Option<usize> {
    collection
        .records()
        .position(|record| {
            spec
                .key_of(record)
                .is_some_and(|candidate| spec.equal(&candidate, key))
        })
}

fn as_key(value: i64) -> KeyValue {
    // Alternate the numeric type to exercise by-value equality.
    if value % 2 == 0 {
        KeyValue::Scalar(Bson::Int64(value))
    } else {
        KeyValue::Scalar(Bson::Double(value as f64))
    }
}

proptest! {
    #[test]
    fn cached_lookup_matches_linear_scan(
        initial in prop::collection::hash_set(arb_key_value(), 0..8),
        steps in prop::collection::vec(arb_step(), 0..64),
    ) {
        let spec = KeySpec::new(KeyExpr::single("id"));
        let store = KeyedStore::new(spec.clone());
        let mut collection = initial
            .iter()
            .map(|id| doc! { "id": Bson::Int32(*id as i32) })
            .collect::<KeyedCollection>();
        collection.ensure_cache(&spec);

        for step in steps {
            match step {
                Step::Insert(id) => {
                    let _ = store.insert(&mut collection, doc! { "id": id.to_string() }, None);
                    let _ = store.insert(&mut collection, doc! { "id": as_key(id).into_bson() }, None);
                },
                Step::InsertKeyless => {
                    let inserted = store.insert(&mut collection, doc! { "name": "x" }, None).unwrap();
                    prop_assert_eq!(store.index_by_key(&collection, &inserted.key), Some(collection.len() - 1));
                },
                Step::Remove(id) => {
                    store.remove(&mut collection, &as_key(id));
                },
                Step::Lookup(id) => {
                    let key = as_key(id);
                    prop_assert_eq!(store.index_by_key(&collection, &key), scan(&spec, &collection, &key));
                },
            }
        }

        for id in 0..16 {
            let key = as_key(id);
            prop_assert_eq!(store.index_by_key(&collection, &key), scan(&spec, &collection, &key));
        }
    }

    #[test]
    fn keys_stay_unique(ids in prop::collection::vec(arb_key_value(), 0..32)) {
        let spec = KeySpec::new(KeyExpr::single("id"));
        let store = KeyedStore::new(spec.clone());
        let mut collection = KeyedCollection::new();

        for id in ids {
            let _ = store.insert(&mut collection, doc! { "id": as_key(id).into_bson() }, None);
            let _ = store.insert(&mut collection, doc! { "name": "generated" }, None);
        }

        let keys = collection
            .records()
            .filter_map(|record| spec.key_of(record))
            .map(|key| key.canonical())
            .collect::<Vec<_>>();
        let distinct = keys.iter().collect::<HashSet<_>>();

        prop_assert_eq!(distinct.len(), keys.len());
    }

    #[test]
    fn removing_absent_keys_changes_nothing(
        present in prop::collection::hash_set(0_i64..8, 0..8),
        absent in 8_i64..64,
    ) {
        let store = KeyedStore::new(KeySpec::new(KeyExpr::single("id")));
        let mut collection = present
            .iter()
            .map(|id| doc! { "id": *id })
            .collect::<KeyedCollection>();
        let before = collection.clone();

        let confirmed = store.remove(&mut collection, &KeyValue::scalar(absent));

        prop_assert_eq!(confirmed, KeyValue::scalar(absent));
        prop_assert_eq!(collection, before);
    }
}

//! Key expressions, key values and key comparison.
//!
//! A [`KeyExpr`] declares which field(s) identify a record. A [`KeyInfo`]
//! implementation extracts a [`KeyValue`] from a record and compares key values
//! according to the shape of the expression.
//!
//! # Example
//!
//! ```ignore
//! use keyedstore::key::{KeyExpr, KeyInfo, KeySpec, KeyValue};
//! use bson::doc;
//!
//! let spec = KeySpec::new(KeyExpr::single("id"));
//! let key = spec.key_of(&doc! { "id": 1, "name": "a" }).unwrap();
//!
//! assert!(spec.equal(&key, &KeyValue::scalar(1_i64)));
//! ```

use std::fmt;
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::value::{canonical_document, canonical_json, documents_equal, values_equal};

/// Declaration of which field(s), if any, identify a record.
///
/// Deserializes from `null`, a field name, or a list of field names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyExpr {
    /// The record itself is its key.
    #[default]
    None,
    /// A single field holds the key.
    Single(String),
    /// Several fields together form the key, compared in this order.
    Composite(Vec<String>),
}

impl KeyExpr {
    /// Creates a single-field key expression.
    pub fn single(field: impl Into<String>) -> Self {
        KeyExpr::Single(field.into())
    }

    /// Creates a composite key expression.
    pub fn composite(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        KeyExpr::Composite(
            fields
                .into_iter()
                .map(Into::into)
                .collect()
        )
    }

    /// Returns `true` unless this is [`KeyExpr::None`].
    pub fn is_defined(&self) -> bool {
        !matches!(self, KeyExpr::None)
    }

    /// Returns the key field names, empty for [`KeyExpr::None`].
    pub fn fields(&self) -> &[String] {
        match self {
            KeyExpr::None => &[],
            KeyExpr::Single(field) => std::slice::from_ref(field),
            KeyExpr::Composite(fields) => fields,
        }
    }

    /// Returns `true` if the record carries at least one of the key fields.
    pub fn is_present_in(&self, record: &Document) -> bool {
        self
            .fields()
            .iter()
            .any(|field| record.contains_key(field))
    }
}

/// The concrete value identifying one record.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    /// The whole record, used when the key expression is [`KeyExpr::None`].
    Record(Document),
    /// The value of a single key field.
    Scalar(Bson),
    /// The values of the composite key fields present on a record.
    Composite(Vec<(String, Bson)>),
}

impl KeyValue {
    /// Creates a scalar key value.
    pub fn scalar(value: impl Into<Bson>) -> Self {
        KeyValue::Scalar(value.into())
    }

    /// Creates a composite key value from field/value pairs.
    pub fn composite<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Bson>,
    {
        KeyValue::Composite(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect()
        )
    }

    /// Returns the value of a named field for record and composite keys.
    pub fn get(&self, field: &str) -> Option<&Bson> {
        match self {
            KeyValue::Record(doc) => doc.get(field),
            KeyValue::Scalar(_) => None,
            KeyValue::Composite(fields) => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, value)| value),
        }
    }

    /// Returns `true` for a composite key with no fields.
    pub fn is_empty(&self) -> bool {
        matches!(self, KeyValue::Composite(fields) if fields.is_empty())
    }

    /// Returns `true` when the key carries no usable value: a composite key with
    /// no fields, or a scalar that is `null`, an empty document or an empty array.
    ///
    /// Inserts generate an id in place of an absent scalar key.
    pub fn is_absent(&self) -> bool {
        match self {
            KeyValue::Record(_) => false,
            KeyValue::Scalar(Bson::Null) => true,
            KeyValue::Scalar(Bson::Document(doc)) => doc.is_empty(),
            KeyValue::Scalar(Bson::Array(values)) => values.is_empty(),
            KeyValue::Scalar(_) => false,
            KeyValue::Composite(fields) => fields.is_empty(),
        }
    }

    /// Returns the canonical serialization of every part of this key.
    ///
    /// See [`KeyInfo::canonical`] for the form that agrees with a key spec's
    /// equality.
    pub fn canonical(&self) -> String {
        match self {
            KeyValue::Record(doc) => canonical_document(doc).to_string(),
            KeyValue::Scalar(value) => canonical_json(value).to_string(),
            KeyValue::Composite(fields) => canonical_document(
                &fields
                    .iter()
                    .cloned()
                    .collect::<Document>()
            ).to_string(),
        }
    }

    /// Converts this key into a BSON value.
    pub fn into_bson(self) -> Bson {
        match self {
            KeyValue::Record(doc) => Bson::Document(doc),
            KeyValue::Scalar(value) => value,
            KeyValue::Composite(fields) => Bson::Document(fields.into_iter().collect()),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<Bson> for KeyValue {
    fn from(value: Bson) -> Self {
        KeyValue::Scalar(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::Scalar(Bson::String(value.to_string()))
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::Scalar(Bson::String(value))
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        KeyValue::Scalar(Bson::Int32(value))
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Scalar(Bson::Int64(value))
    }
}

impl From<Document> for KeyValue {
    fn from(value: Document) -> Self {
        KeyValue::Record(value)
    }
}


/// Abstraction over how to extract and compare a key from a record.
pub trait KeyInfo {
    /// Returns the key expression.
    fn key(&self) -> &KeyExpr;

    /// Extracts the key value of a record.
    ///
    /// Returns `None` when the record carries no key value: the single key field
    /// is missing, or none of the composite key fields are present.
    fn key_of(&self, record: &Document) -> Option<KeyValue>;

    /// Compares two key values according to the shape of the key expression.
    fn equal(&self, left: &KeyValue, right: &KeyValue) -> bool;

    /// Returns the canonical serialization of a key value.
    ///
    /// Keys that compare equal under [`KeyInfo::equal`] must share the same
    /// canonical form.
    fn canonical(&self, key: &KeyValue) -> String {
        key.canonical()
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyComparator {
    Scalar,
    Composite,
}

impl KeyComparator {
    fn for_expr(expr: &KeyExpr) -> Self {
        match expr {
            KeyExpr::Composite(_) => KeyComparator::Composite,
            KeyExpr::None | KeyExpr::Single(_) => KeyComparator::Scalar,
        }
    }
}

/// The standard [`KeyInfo`] implementation.
///
/// The comparator is chosen once from the shape of the key expression.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySpec {
    expr: KeyExpr,
    comparator: KeyComparator,
}

impl KeySpec {
    /// Creates a key spec for the given expression.
    pub fn new(expr: KeyExpr) -> Self {
        let comparator = KeyComparator::for_expr(&expr);

        Self { expr, comparator }
    }
}

impl From<KeyExpr> for KeySpec {
    fn from(expr: KeyExpr) -> Self {
        KeySpec::new(expr)
    }
}

impl KeyInfo for KeySpec {
    fn key(&self) -> &KeyExpr {
        &self.expr
    }

    fn key_of(&self, record: &Document) -> Option<KeyValue> {
        match &self.expr {
            KeyExpr::None => Some(KeyValue::Record(record.clone())),
            KeyExpr::Single(field) => record
                .get(field)
                .cloned()
                .map(KeyValue::Scalar),
            KeyExpr::Composite(fields) => {
                let values = fields
                    .iter()
                    .filter_map(|field| {
                        record
                            .get(field)
                            .map(|value| (field.clone(), value.clone()))
                    })
                    .collect::<Vec<_>>();

                (!values.is_empty()).then_some(KeyValue::Composite(values))
            },
        }
    }

    fn equal(&self, left: &KeyValue, right: &KeyValue) -> bool {
        match self.comparator {
            KeyComparator::Scalar => match (left, right) {
                (KeyValue::Scalar(a), KeyValue::Scalar(b)) => values_equal(a, b),
                (KeyValue::Record(a), KeyValue::Record(b)) => documents_equal(a, b),
                (KeyValue::Scalar(Bson::Document(a)), KeyValue::Record(b))
                | (KeyValue::Record(a), KeyValue::Scalar(Bson::Document(b))) => documents_equal(a, b),
                _ => false,
            },
            KeyComparator::Composite => match (left, right) {
                (KeyValue::Composite(_), KeyValue::Composite(_)) => self
                    .expr
                    .fields()
                    .iter()
                    .all(|field| match (left.get(field), right.get(field)) {
                        (Some(a), Some(b)) => values_equal(a, b),
                        (None, None) => true,
                        _ => false,
                    }),
                _ => false,
            },
        }
    }

    fn canonical(&self, key: &KeyValue) -> String {
        match (self.comparator, key) {
            // Only the expression's fields take part in composite equality
            (KeyComparator::Composite, KeyValue::Composite(_)) => canonical_document(
                &self
                    .expr
                    .fields()
                    .iter()
                    .filter_map(|field| key.get(field).map(|value| (field.clone(), value.clone())))
                    .collect::<Document>()
            ).to_string(),
            _ => key.canonical(),
        }
    }
}

//! Value semantics for key comparison.
//!
//! Keys are compared by value rather than by BSON type: integers compare
//! exactly, a double equals an integer only when it holds that exact integral
//! value, documents compare field-by-field regardless of field order and arrays
//! compare element-wise. [`canonical_json`] produces a
//! serialization that agrees with this equality, which is what the existence
//! cache stores.

use std::collections::{BTreeMap, HashMap};
use bson::{Bson, Document, datetime::DateTime};
use serde_json::{Map, Number, Value, json};


/// Type-erased, comparable representation of BSON values.
///
/// Integer types are widened to `i64`; doubles stay `f64`. Types without a
/// natural value semantic (binary, object ids, regexes, ...) fall back to BSON equality.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (`Int32` and `Int64`)
    Int(i64),
    /// Floating point value
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON value, compared as-is
    Other(&'a Bson),
}

impl<'a> Comparable<'a> {
    fn from_document(doc: &'a Document) -> Self {
        Comparable::Map(
            doc
                .iter()
                .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                .collect::<HashMap<_, _>>()
        )
    }

    fn to_json(&self) -> Value {
        match self {
            Comparable::Null => Value::Null,
            Comparable::Bool(value) => Value::Bool(*value),
            Comparable::Int(value) => Value::Number(Number::from(*value)),
            // Integral doubles serialize like the integer they equal (-0.0 included)
            Comparable::Number(value) => match exact_integer(*value) {
                Some(integer) => Value::Number(Number::from(integer)),
                None => Number::from_f64(*value)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            Comparable::DateTime(value) => json!({ "$date": value.timestamp_millis() }),
            Comparable::String(value) => Value::String(value.to_string()),
            Comparable::Array(values) => Value::Array(
                values
                    .iter()
                    .map(Comparable::to_json)
                    .collect()
            ),
            Comparable::Map(fields) => {
                let sorted = fields
                    .iter()
                    .collect::<BTreeMap<_, _>>();

                let mut map = Map::with_capacity(sorted.len());
                for (key, value) in sorted {
                    map.insert(key.to_string(), value.to_json());
                }

                Value::Object(map)
            },
            Comparable::Other(value) => json!({ "$bson": format!("{value:?}") }),
        }
    }
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::from_document(doc),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::Int(a), Comparable::Number(b))
            | (Comparable::Number(b), Comparable::Int(a)) => exact_integer(*b) == Some(*a),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}


/// Returns the integer a double holds exactly, if any.
fn exact_integer(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;

    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Returns `true` when two BSON values are equal by value.
pub fn values_equal(left: &Bson, right: &Bson) -> bool {
    Comparable::from(left) == Comparable::from(right)
}

/// Returns `true` when two documents hold the same fields with equal values.
pub fn documents_equal(left: &Document, right: &Document) -> bool {
    Comparable::from_document(left) == Comparable::from_document(right)
}

/// Serializes a value into its canonical JSON form.
///
/// Values that are equal under [`values_equal`] always produce the same JSON.
pub fn canonical_json(value: &Bson) -> Value {
    Comparable::from(value).to_json()
}

/// Serializes a document into its canonical JSON form.
pub fn canonical_document(doc: &Document) -> Value {
    Comparable::from_document(doc).to_json()
}

//! Identifier generation for records inserted without a key value.

use bson::Bson;
use uuid::Uuid;

/// Produces fresh, globally unique key values.
pub trait IdGenerator: Send + Sync {
    /// Returns a value that has never been returned before.
    fn new_id(&self) -> Bson;
}

/// Generates random (v4) UUIDs rendered as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> Bson {
        Bson::String(Uuid::new_v4().to_string())
    }
}

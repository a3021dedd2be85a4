//! Document identifiers for persisted Foodies records.
//!
//! Identifiers keep the 12-byte layout used by the fixture exports: a 4-byte
//! big-endian creation time in seconds, 5 bytes chosen once per process and a
//! 3-byte counter. They render as 24 lowercase hex characters.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use seed_fixtures::{OBJECT_ID_LEN, ObjectId, ObjectIdError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Identifier of a category, area, ingredient, user, recipe or testimonial.
///
/// # Examples
/// ```
/// use backend::domain::RecordId;
///
/// let id = RecordId::parse("64b1f0a2c3d4e5f601234567").expect("valid id");
/// assert_eq!(id.to_string(), "64b1f0a2c3d4e5f601234567");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        let seconds = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let process = PROCESS_UNIQUE.get_or_init(rand::random);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0_u8; OBJECT_ID_LEN];
        let (time_part, rest) = bytes.split_at_mut(4);
        time_part.copy_from_slice(&seconds.to_be_bytes());
        let (process_part, counter_part) = rest.split_at_mut(5);
        process_part.copy_from_slice(process);
        if let Some(low) = counter.to_be_bytes().get(1..) {
            counter_part.copy_from_slice(low);
        }
        Self(ObjectId::from_bytes(bytes))
    }

    /// Parse a 24-character hex identifier.
    pub fn parse(value: &str) -> Result<Self, ObjectIdError> {
        ObjectId::parse_str(value.trim()).map(Self)
    }

    /// The underlying fixture identifier.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for RecordId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<RecordId> for ObjectId {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ObjectId::deserialize(deserializer).map(Self)
    }
}

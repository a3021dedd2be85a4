//! Twelve-byte document identifiers in their 24-character hex form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ObjectIdError;

/// Number of raw bytes in an [`ObjectId`].
pub const OBJECT_ID_LEN: usize = 12;

/// A 12-byte identifier rendered as 24 lowercase hex characters.
///
/// # Examples
///
/// ```
/// use seed_fixtures::ObjectId;
///
/// let id: ObjectId = "64B1F0A2C3D4E5F601234567".parse().expect("valid id");
/// assert_eq!(id.to_string(), "64b1f0a2c3d4e5f601234567");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Wrap raw identifier bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw identifier bytes.
    #[must_use]
    pub const fn bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.0
    }

    /// Render the identifier as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 24-character hex string, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectIdError`] when the input has the wrong length or is not
    /// hexadecimal.
    pub fn parse_str(value: &str) -> Result<Self, ObjectIdError> {
        let length = value.chars().count();
        if length != OBJECT_ID_LEN * 2 {
            return Err(ObjectIdError::InvalidLength { length });
        }
        let mut bytes = [0_u8; OBJECT_ID_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| ObjectIdError::InvalidHex {
            value: value.to_owned(),
        })?;
        Ok(Self(bytes))
    }

    /// Return true when `value` parses as an identifier.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        Self::parse_str(value).is_ok()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parses_mixed_case_hex() {
        let id = ObjectId::parse_str("64B1f0a2c3d4e5f601234567").expect("valid id");
        assert_eq!(id.to_hex(), "64b1f0a2c3d4e5f601234567");
    }

    #[rstest]
    #[case("", ObjectIdError::InvalidLength { length: 0 })]
    #[case("abc", ObjectIdError::InvalidLength { length: 3 })]
    #[case(
        "zzb1f0a2c3d4e5f601234567",
        ObjectIdError::InvalidHex { value: "zzb1f0a2c3d4e5f601234567".to_owned() }
    )]
    fn rejects_malformed_input(#[case] input: &str, #[case] expected: ObjectIdError) {
        assert_eq!(ObjectId::parse_str(input), Err(expected));
    }

    #[rstest]
    fn serializes_as_hex_string() {
        let id = ObjectId::from_bytes([0xab; OBJECT_ID_LEN]);
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"abababababababababababab\"");
        let back: ObjectId = serde_json::from_str(&json).expect("deserialize id");
        assert_eq!(back, id);
    }
}

//! Fixture values with extended-JSON wrappers resolved to native types.
//!
//! Fixture exports encode identifiers as `{"$oid": "..."}` and timestamps as
//! `{"$date": ...}`. [`normalize`] walks an arbitrary JSON tree and replaces
//! every such wrapper with [`FixtureValue::ObjectId`] or
//! [`FixtureValue::DateTime`], leaving everything else structurally intact.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value};

use crate::error::NormalizeError;
use crate::object_id::ObjectId;

const OID_KEY: &str = "$oid";
const DATE_KEY: &str = "$date";
const NUMBER_LONG_KEY: &str = "$numberLong";

/// A JSON value whose identifier and date wrappers have been unwrapped.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number, kept in its original precision.
    Number(Number),
    /// JSON string.
    String(String),
    /// Ordered sequence.
    Array(Vec<FixtureValue>),
    /// Keyed map.
    Object(BTreeMap<String, FixtureValue>),
    /// Identifier unwrapped from `{"$oid": ...}`.
    ObjectId(ObjectId),
    /// Timestamp unwrapped from `{"$date": ...}`.
    DateTime(DateTime<Utc>),
}

impl FixtureValue {
    /// Look up `key` when this value is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Borrow the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the elements when this value is a sequence.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Return true for values a loosely typed source treats as "unset":
    /// `null`, `false`, zero and the empty string.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(flag) => !flag,
            Self::Number(number) => number.as_f64().is_some_and(|n| n.abs() < f64::EPSILON),
            Self::String(text) => text.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::ObjectId(_) | Self::DateTime(_) => false,
        }
    }
}

impl From<Value> for FixtureValue {
    /// Lift a JSON tree without interpreting wrappers.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Normalize a raw JSON value.
///
/// # Errors
///
/// Returns [`NormalizeError`] when a wrapper is recognised but its payload
/// cannot be converted.
///
/// # Examples
///
/// ```
/// use seed_fixtures::{FixtureValue, normalize};
/// use serde_json::json;
///
/// let value = normalize(json!({"_id": {"$oid": "64b1f0a2c3d4e5f601234567"}}))
///     .expect("valid wrapper");
/// assert!(matches!(value.get("_id"), Some(FixtureValue::ObjectId(_))));
/// ```
pub fn normalize(value: Value) -> Result<FixtureValue, NormalizeError> {
    normalize_value(FixtureValue::from(value))
}

/// Normalize an already lifted value.
///
/// Applying this function to its own output returns an equal value: unwrapped
/// identifiers and timestamps no longer look like wrappers.
///
/// # Errors
///
/// Returns [`NormalizeError`] when a wrapper payload cannot be converted.
pub fn normalize_value(value: FixtureValue) -> Result<FixtureValue, NormalizeError> {
    match value {
        FixtureValue::Array(items) => items
            .into_iter()
            .map(normalize_value)
            .collect::<Result<Vec<_>, _>>()
            .map(FixtureValue::Array),
        FixtureValue::Object(map) => normalize_map(map),
        scalar => Ok(scalar),
    }
}

fn normalize_map(map: BTreeMap<String, FixtureValue>) -> Result<FixtureValue, NormalizeError> {
    if map.len() == 1 {
        if let Some(FixtureValue::String(hex)) = map.get(OID_KEY) {
            return Ok(FixtureValue::ObjectId(ObjectId::parse_str(hex)?));
        }
        if let Some(payload) = map.get(DATE_KEY) {
            return parse_date(payload).map(FixtureValue::DateTime);
        }
    }
    map.into_iter()
        .map(|(key, child)| normalize_value(child).map(|normalized| (key, normalized)))
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(FixtureValue::Object)
}

fn parse_date(payload: &FixtureValue) -> Result<DateTime<Utc>, NormalizeError> {
    match payload {
        FixtureValue::String(text) => parse_date_text(text),
        FixtureValue::Number(number) => number
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| invalid_date(format!("millisecond value {number} is out of range"))),
        FixtureValue::Object(inner) => match inner.get(NUMBER_LONG_KEY) {
            Some(FixtureValue::String(millis)) if inner.len() == 1 => millis
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| invalid_date(format!("'{millis}' is not a millisecond count"))),
            _ => Err(invalid_date("unsupported nested date payload")),
        },
        _ => Err(invalid_date("unsupported date payload")),
    }
}

fn parse_date_text(text: &str) -> Result<DateTime<Utc>, NormalizeError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid_date(format!("'{text}' is not a recognised timestamp")))
}

fn invalid_date(message: impl Into<String>) -> NormalizeError {
    NormalizeError::InvalidDate {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    const HEX: &str = "64b1f0a2c3d4e5f601234567";

    fn expected_id() -> ObjectId {
        ObjectId::parse_str(HEX).expect("valid id")
    }

    #[rstest]
    #[case(json!({"$date": "2024-03-01T12:00:00Z"}))]
    #[case(json!({"$date": "2024-03-01T12:00:00.000"}))]
    #[case(json!({"$date": 1_709_294_400_000_i64}))]
    #[case(json!({"$date": {"$numberLong": "1709294400000"}}))]
    fn unwraps_every_date_encoding(#[case] raw: Value) {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("date");
        assert_eq!(normalize(raw), Ok(FixtureValue::DateTime(expected)));
    }

    #[rstest]
    fn unwraps_nested_identifiers_inside_arrays_and_maps() {
        let raw = json!({
            "owner": {"$oid": HEX},
            "followers": [{"$oid": HEX}, "plain"],
            "meta": {"nested": {"deeper": {"$oid": HEX}}}
        });
        let value = normalize(raw).expect("normalizes");

        assert_eq!(value.get("owner"), Some(&FixtureValue::ObjectId(expected_id())));
        assert_eq!(
            value.get("followers").and_then(FixtureValue::as_array),
            Some(
                &[
                    FixtureValue::ObjectId(expected_id()),
                    FixtureValue::String("plain".to_owned())
                ][..]
            )
        );
        assert_eq!(
            value.get("meta").and_then(|m| m.get("nested")).and_then(|n| n.get("deeper")),
            Some(&FixtureValue::ObjectId(expected_id()))
        );
    }

    #[rstest]
    #[case(json!({"title": "Pizza", "time": "20", "tags": ["a", 1, null, true]}))]
    #[case(json!({"_id": {"$oid": HEX}, "createdAt": {"$date": "2024-01-01T00:00:00Z"}}))]
    #[case(json!({"$oid": HEX, "extra": 1}))]
    #[case(json!({"$oid": 7}))]
    #[case(json!([[{"$date": 0}]]))]
    fn normalizing_twice_changes_nothing(#[case] raw: Value) {
        let once = normalize(raw).expect("first pass");
        let twice = normalize_value(once.clone()).expect("second pass");
        assert_eq!(once, twice);
    }

    #[rstest]
    fn leaves_multi_key_maps_structurally_unchanged() {
        let value = normalize(json!({"$oid": HEX, "extra": 1})).expect("normalizes");
        assert_eq!(value.get("$oid").and_then(FixtureValue::as_str), Some(HEX));
    }

    #[rstest]
    #[case(json!({"$oid": "not-hex"}))]
    #[case(json!({"$date": "yesterday"}))]
    #[case(json!({"$date": {"$numberLong": "soon"}}))]
    #[case(json!({"$date": true}))]
    fn rejects_broken_wrappers(#[case] raw: Value) {
        assert!(normalize(json!({"field": raw})).is_err());
    }

    #[rstest]
    #[case(FixtureValue::Null, true)]
    #[case(FixtureValue::String(String::new()), true)]
    #[case(FixtureValue::Number(Number::from(0)), true)]
    #[case(FixtureValue::Number(Number::from(3)), false)]
    #[case(FixtureValue::String("x".to_owned()), false)]
    fn falsy_matches_loose_truthiness(#[case] value: FixtureValue, #[case] expected: bool) {
        assert_eq!(value.is_falsy(), expected);
    }
}

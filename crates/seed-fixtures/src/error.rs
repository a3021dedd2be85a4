//! Error types for the seed-fixtures crate.
//!
//! Reading never fails (missing or broken files load as empty sets), so the
//! errors here describe individual values and records. Callers treat each of
//! them as a per-record skip.

use thiserror::Error;

/// Errors raised when parsing a 12-byte object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdError {
    /// The input was not exactly 24 characters long.
    #[error("object id must be 24 hex characters, found {length}")]
    InvalidLength {
        /// Number of characters in the rejected input.
        length: usize,
    },

    /// The input contained non-hexadecimal characters.
    #[error("object id '{value}' is not valid hex")]
    InvalidHex {
        /// The rejected input.
        value: String,
    },
}

/// Errors raised while unwrapping extended-JSON encodings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// An `$oid` wrapper carried an unparseable identifier.
    #[error("invalid $oid wrapper: {source}")]
    InvalidObjectId {
        /// Underlying identifier error.
        #[from]
        source: ObjectIdError,
    },

    /// A `$date` wrapper carried a payload that is not a recognised date.
    #[error("invalid $date wrapper: {message}")]
    InvalidDate {
        /// Description of the rejected payload.
        message: String,
    },
}

/// Errors raised when decoding a normalized value into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The raw value could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The record itself is not a JSON object.
    #[error("expected an object record")]
    NotAnObject,

    /// A required field is absent, null or blank.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },

    /// A field is present but has the wrong type.
    #[error("field '{field}' has an unexpected type")]
    UnexpectedType {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A text field contains a NUL character, which the store cannot hold.
    #[error("field '{field}' contains a NUL character")]
    NulCharacter {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl RecordError {
    pub(crate) const fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub(crate) const fn unexpected(field: &'static str) -> Self {
        Self::UnexpectedType { field }
    }

    pub(crate) const fn nul(field: &'static str) -> Self {
        Self::NulCharacter { field }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        RecordError::missing("title"),
        "missing required field 'title'"
    )]
    #[case(
        RecordError::unexpected("area"),
        "field 'area' has an unexpected type"
    )]
    #[case(
        RecordError::Normalize(NormalizeError::InvalidDate { message: "bad".to_owned() }),
        "invalid $date wrapper: bad"
    )]
    fn record_error_formats_message(#[case] error: RecordError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn object_id_error_converts_into_normalize_error() {
        let error = NormalizeError::from(ObjectIdError::InvalidLength { length: 3 });
        assert_eq!(
            error.to_string(),
            "invalid $oid wrapper: object id must be 24 hex characters, found 3"
        );
    }
}

//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, RecordId};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be a 24-character hexadecimal identifier"),
    )
    .with_value(ErrorCode::InvalidId, value)
}

pub(crate) fn parse_record_id(value: &str, field: FieldName) -> Result<RecordId, Error> {
    RecordId::parse(value.trim()).map_err(|_| invalid_id_error(field, value))
}

/// Parse an optional filter id. Blank values count as absent.
pub(crate) fn parse_optional_record_id(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<RecordId>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_record_id(raw, field))
        .transpose()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("category");

    #[rstest]
    #[case("64b1f0a2c3d4e5f601234567")]
    #[case(" 64B1F0A2C3D4E5F601234567 ")]
    fn parses_hex_ids(#[case] raw: &str) {
        let id = parse_record_id(raw, FIELD).expect("valid id");
        assert_eq!(id.to_string(), "64b1f0a2c3d4e5f601234567");
    }

    #[rstest]
    fn malformed_ids_report_field_and_value() {
        let err = parse_record_id("not-an-id", FIELD).expect_err("invalid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "category", "value": "not-an-id", "code": "invalid_id"}))
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_filters_are_absent(#[case] raw: Option<&str>) {
        assert_eq!(parse_optional_record_id(raw, FIELD).expect("ok"), None);
    }
}

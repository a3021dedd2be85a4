//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{success: false, error, code}`
//! envelope with a matching status code.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

const REDACTED_MESSAGE: &str = "Internal server error";

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    #[schema(example = "Recipe not found")]
    pub error: String,
    /// Stable machine-readable code.
    pub code: ErrorCode,
    /// Trace identifier of the failed request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Supplementary details for clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        let internal = matches!(error.code(), ErrorCode::InternalError);
        Self {
            success: false,
            error: if internal {
                REDACTED_MESSAGE.to_owned()
            } else {
                error.message().to_owned()
            },
            code: error.code(),
            trace_id: error.trace_id().map(str::to_owned),
            details: if internal {
                None
            } else {
                error.details().cloned()
            },
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(error = %self, trace_id = ?self.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope::from(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    //! Tests for HTTP error mapping.
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::json;

    const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

    async fn body_of(error: &Error) -> Value {
        let response = ResponseError::error_response(error);
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        serde_json::from_slice(&bytes).expect("error JSON")
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(ResponseError::status_code(&error), status);
    }

    #[rstest]
    #[actix_web::test]
    async fn not_found_envelope_carries_message_and_trace_id() {
        let error = Error::not_found("Recipe not found").with_trace_id(TRACE_ID);
        let response = ResponseError::error_response(&error);
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace-id header")
            .to_str()
            .expect("ascii header");
        assert_eq!(header, TRACE_ID);

        let body = body_of(&error).await;
        insta::with_settings!({ sort_maps => true }, {
            insta::assert_json_snapshot!(body, @r#"
            {
              "code": "not_found",
              "error": "Recipe not found",
              "success": false,
              "traceId": "00000000-0000-0000-0000-000000000000"
            }
            "#);
        });
    }

    #[rstest]
    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let error = Error::internal("connection string leaked")
            .with_trace_id(TRACE_ID)
            .with_details(json!({"secret": "x"}));
        let body = body_of(&error).await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "internal_error");
        assert!(body.get("details").is_none());
        assert_eq!(body["traceId"], TRACE_ID);
    }

    #[rstest]
    #[actix_web::test]
    async fn details_pass_through_for_client_errors() {
        let error = Error::invalid_request("Invalid recipe id").with_details(json!({"id": "zz"}));
        let body = body_of(&error).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["details"], json!({"id": "zz"}));
        assert!(body.get("traceId").is_none());
    }
}

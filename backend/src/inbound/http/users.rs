//! Public user profile endpoint.
//!
//! ```text
//! GET /api/users/{id}
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::UserProfile;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::DataEnvelope;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_record_id};

const ID: FieldName = FieldName::new("id");

/// Fetch a public profile with recipe and follow counts. Credentials are
/// never part of the response.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = DataEnvelope<UserProfile>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path, ID)?;
    let profile = state.users.profile(id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(profile)))
}

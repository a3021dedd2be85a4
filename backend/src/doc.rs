//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every read endpoint of the inbound HTTP adapter and
//! the schemas their envelopes embed. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{
    Area, Category, ErrorCode, Ingredient, IngredientSummary, NamedRef, RecipeIngredientView,
    RecipeView, TestimonialView, UserProfile, UserSummary,
};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::health::HealthStatus;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodies API",
        description = "Read API over recipes, reference data, testimonials and user profiles."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::api_health,
        crate::inbound::http::catalogue::list_categories,
        crate::inbound::http::catalogue::get_category,
        crate::inbound::http::catalogue::list_areas,
        crate::inbound::http::catalogue::get_area,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::catalogue::list_testimonials,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::popular_recipes,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::users::get_user,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorCode,
        HealthStatus,
        Category,
        Area,
        Ingredient,
        IngredientSummary,
        NamedRef,
        TestimonialView,
        UserSummary,
        UserProfile,
        RecipeView,
        RecipeIngredientView,
        pagination::Pagination,
    )),
    tags(
        (name = "health", description = "Endpoints for health checks"),
        (name = "catalogue", description = "Categories, areas, ingredients and testimonials"),
        (name = "recipes", description = "Recipe listings and details"),
        (name = "users", description = "Public user profiles")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_envelope_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get("ErrorEnvelope").expect("ErrorEnvelope schema");

        for field in ["success", "error", "code", "traceId"] {
            assert_object_schema_has_field(envelope, field);
        }
    }

    #[rstest]
    fn profile_schema_omits_credentials() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let profile = schemas.get("UserProfile").expect("UserProfile schema");

        assert_object_schema_has_field(profile, "recipesCount");
        match profile {
            RefOr::T(Schema::Object(obj)) => assert!(!obj.properties.contains_key("password")),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/recipes")]
    #[case("/api/recipes/popular")]
    #[case("/api/recipes/{id}")]
    #[case("/api/categories/{id}")]
    #[case("/api/areas/{id}")]
    #[case("/api/ingredients/{id}")]
    #[case("/api/users/{id}")]
    #[case("/api/testimonials")]
    #[case("/api/health")]
    fn documents_read_endpoints(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}

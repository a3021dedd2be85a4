//! Reference-data read endpoints.
//!
//! ```text
//! GET /api/categories
//! GET /api/categories/{id}
//! GET /api/areas
//! GET /api/areas/{id}
//! GET /api/ingredients
//! GET /api/ingredients/{id}
//! GET /api/testimonials
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::{Area, Category, Ingredient, TestimonialView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{DataEnvelope, ListEnvelope};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_record_id};

const ID: FieldName = FieldName::new("id");

/// List every category, sorted by name.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories", body = ListEnvelope<Category>),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let categories = state.catalogue.categories().await?;
    Ok(HttpResponse::Ok().json(ListEnvelope::new(categories)))
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = DataEnvelope<Category>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Category not found", body = ErrorEnvelope),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "getCategory"
)]
#[get("/categories/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path, ID)?;
    let category = state.catalogue.category(id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(category)))
}

/// List every cuisine area, sorted by name.
#[utoipa::path(
    get,
    path = "/api/areas",
    responses(
        (status = 200, description = "Areas", body = ListEnvelope<Area>),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "listAreas"
)]
#[get("/areas")]
pub async fn list_areas(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let areas = state.catalogue.areas().await?;
    Ok(HttpResponse::Ok().json(ListEnvelope::new(areas)))
}

/// Fetch one cuisine area.
#[utoipa::path(
    get,
    path = "/api/areas/{id}",
    params(("id" = String, Path, description = "Area id")),
    responses(
        (status = 200, description = "Area", body = DataEnvelope<Area>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Area not found", body = ErrorEnvelope),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "getArea"
)]
#[get("/areas/{id}")]
pub async fn get_area(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path, ID)?;
    let area = state.catalogue.area(id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(area)))
}

/// List every ingredient, sorted by name.
#[utoipa::path(
    get,
    path = "/api/ingredients",
    responses(
        (status = 200, description = "Ingredients", body = ListEnvelope<Ingredient>),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "listIngredients"
)]
#[get("/ingredients")]
pub async fn list_ingredients(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let ingredients = state.catalogue.ingredients().await?;
    Ok(HttpResponse::Ok().json(ListEnvelope::new(ingredients)))
}

/// Fetch one ingredient.
#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    params(("id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = DataEnvelope<Ingredient>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Ingredient not found", body = ErrorEnvelope),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient"
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path, ID)?;
    let ingredient = state.catalogue.ingredient(id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(ingredient)))
}

/// List testimonials, newest first, with their owners.
#[utoipa::path(
    get,
    path = "/api/testimonials",
    responses(
        (status = 200, description = "Testimonials", body = ListEnvelope<TestimonialView>),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "listTestimonials"
)]
#[get("/testimonials")]
pub async fn list_testimonials(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let testimonials = state.catalogue.testimonials().await?;
    Ok(HttpResponse::Ok().json(ListEnvelope::new(testimonials)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{AREA_NOT_FOUND, Error, UserSummary};
    use crate::inbound::http::test_utils::{MockPorts, record_id};
    use actix_web::{App, http::StatusCode, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::Value;

    fn app_scope() -> actix_web::Scope {
        web::scope("/api")
            .service(list_categories)
            .service(get_category)
            .service(list_areas)
            .service(get_area)
            .service(list_ingredients)
            .service(get_ingredient)
            .service(list_testimonials)
    }

    #[rstest]
    #[actix_web::test]
    async fn categories_are_wrapped_in_a_counted_envelope() {
        let mut ports = MockPorts::default();
        ports.catalogue.expect_categories().times(1).return_once(|| {
            Ok(vec![
                Category {
                    id: record_id("64b1f0a2c3d4e5f601234567"),
                    name: "Beef".to_owned(),
                },
                Category {
                    id: record_id("64b1f0a2c3d4e5f601234568"),
                    name: "Dessert".to_owned(),
                },
            ])
        });
        let app = test::init_service(App::new().app_data(ports.into_state()).service(app_scope()))
            .await;

        let req = test::TestRequest::get().uri("/api/categories").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        insta::with_settings!({ sort_maps => true }, {
            insta::assert_json_snapshot!(body, @r#"
            {
              "count": 2,
              "data": [
                {
                  "id": "64b1f0a2c3d4e5f601234567",
                  "name": "Beef"
                },
                {
                  "id": "64b1f0a2c3d4e5f601234568",
                  "name": "Dessert"
                }
              ],
              "success": true
            }
            "#);
        });
    }

    #[rstest]
    #[actix_web::test]
    async fn testimonials_render_missing_owner_as_null() {
        let mut ports = MockPorts::default();
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("date");
        ports.catalogue.expect_testimonials().times(1).return_once(move || {
            Ok(vec![
                TestimonialView {
                    id: record_id("64b1f0a2c3d4e5f6012345a1"),
                    text: "Lovely recipes".to_owned(),
                    name: "Ann".to_owned(),
                    owner: Some(UserSummary {
                        id: record_id("64b1f0a2c3d4e5f6012345b1"),
                        name: "Ann".to_owned(),
                        avatar: None,
                    }),
                    created_at,
                },
                TestimonialView {
                    id: record_id("64b1f0a2c3d4e5f6012345a2"),
                    text: "Great".to_owned(),
                    name: "Anonymous User".to_owned(),
                    owner: None,
                    created_at,
                },
            ])
        });
        let app = test::init_service(App::new().app_data(ports.into_state()).service(app_scope()))
            .await;

        let req = test::TestRequest::get().uri("/api/testimonials").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["owner"]["name"], "Ann");
        assert!(body["data"][1]["owner"].is_null());
    }

    #[rstest]
    #[actix_web::test]
    async fn unavailable_store_maps_to_503() {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_areas()
            .times(1)
            .return_once(|| Err(Error::service_unavailable("database unavailable")));
        let app = test::init_service(App::new().app_data(ports.into_state()).service(app_scope()))
            .await;

        let req = test::TestRequest::get().uri("/api/areas").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "service_unavailable");
    }

    #[rstest]
    #[actix_web::test]
    async fn category_detail_is_wrapped_in_a_data_envelope() {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_category()
            .withf(|id| *id == record_id("64b1f0a2c3d4e5f601234567"))
            .times(1)
            .return_once(|id| {
                Ok(Category {
                    id,
                    name: "Dessert".to_owned(),
                })
            });
        let app = test::init_service(App::new().app_data(ports.into_state()).service(app_scope()))
            .await;

        let req = test::TestRequest::get()
            .uri("/api/categories/64b1f0a2c3d4e5f601234567")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "Dessert");
        assert!(body.get("count").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_area_is_404() {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_area()
            .times(1)
            .return_once(|_| Err(Error::not_found(AREA_NOT_FOUND)));
        let app = test::init_service(App::new().app_data(ports.into_state()).service(app_scope()))
            .await;

        let req = test::TestRequest::get()
            .uri("/api/areas/64b1f0a2c3d4e5f601234567")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Area not found");
    }

    #[rstest]
    #[case("/api/categories/not-an-id")]
    #[case("/api/areas/123")]
    #[case("/api/ingredients/zzzzzzzzzzzzzzzzzzzzzzzz")]
    #[actix_web::test]
    async fn malformed_detail_ids_are_400(#[case] uri: &str) {
        let ports = MockPorts::default();
        let app = test::init_service(App::new().app_data(ports.into_state()).service(app_scope()))
            .await;

        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "invalid_id");
    }
}

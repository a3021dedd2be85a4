//! Recipe read endpoints.
//!
//! ```text
//! GET /api/recipes?page&limit&category&area&ingredient&author&search
//! GET /api/recipes/popular?limit
//! GET /api/recipes/{id}
//! ```
//!
//! `popular` must be registered before `{id}` so the literal segment wins.

use actix_web::{HttpResponse, get, web};
use pagination::{DEFAULT_LIMIT, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{RecipeFilter, RecipeView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{DataEnvelope, ListEnvelope, PageEnvelope};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_record_id, parse_record_id};

/// Number of recipes returned by `popular` when no limit is given.
pub const POPULAR_DEFAULT_LIMIT: u32 = 4;

const CATEGORY: FieldName = FieldName::new("category");
const AREA: FieldName = FieldName::new("area");
const AUTHOR: FieldName = FieldName::new("author");
const ID: FieldName = FieldName::new("id");

/// Query parameters of the recipe listing. Paging values that are missing
/// or not positive integers fall back to the defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// One-based page number (default 1).
    pub page: Option<String>,
    /// Page size (default 12, at most 100).
    pub limit: Option<String>,
    /// Category id.
    pub category: Option<String>,
    /// Area id.
    pub area: Option<String>,
    /// Ingredient id, matched against `ingredientRef`.
    pub ingredient: Option<String>,
    /// Author id.
    pub author: Option<String>,
    /// Case-insensitive text over title, description and instructions.
    pub search: Option<String>,
}

impl RecipeListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref(), DEFAULT_LIMIT)
    }

    fn filter(&self) -> ApiResult<RecipeFilter> {
        Ok(RecipeFilter {
            category: parse_optional_record_id(self.category.as_deref(), CATEGORY)?,
            area: parse_optional_record_id(self.area.as_deref(), AREA)?,
            author: parse_optional_record_id(self.author.as_deref(), AUTHOR)?,
            ingredient: non_blank(self.ingredient.as_deref()),
            search: non_blank(self.search.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::to_owned)
}

/// Query parameters of the popular listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PopularQuery {
    /// Number of recipes (default 4, at most 100).
    pub limit: Option<String>,
}

/// List recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "One page of recipes", body = PageEnvelope<RecipeView>),
        (status = 400, description = "Malformed filter id", body = ErrorEnvelope),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.filter()?;
    let page = state.recipes.list(filter, query.page_request()).await?;
    Ok(HttpResponse::Ok().json(PageEnvelope::from(page)))
}

/// List the most favorited recipes.
#[utoipa::path(
    get,
    path = "/api/recipes/popular",
    params(PopularQuery),
    responses(
        (status = 200, description = "Popular recipes", body = ListEnvelope<RecipeView>),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["recipes"],
    operation_id = "popularRecipes"
)]
#[get("/recipes/popular")]
pub async fn popular_recipes(
    state: web::Data<HttpState>,
    query: web::Query<PopularQuery>,
) -> ApiResult<HttpResponse> {
    let limit =
        PageRequest::from_query(None, query.limit.as_deref(), POPULAR_DEFAULT_LIMIT).limit();
    let recipes = state.recipes.popular(limit).await?;
    Ok(HttpResponse::Ok().json(ListEnvelope::new(recipes)))
}

/// Fetch one recipe with its references populated.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = DataEnvelope<RecipeView>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Recipe not found", body = ErrorEnvelope),
        (status = 503, description = "Service unavailable", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_record_id(&path, ID)?;
    let recipe = state.recipes.detail(id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(recipe)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Error;
    use crate::inbound::http::test_utils::{MockPorts, record_id};
    use actix_web::{App, http::StatusCode, test};
    use chrono::{TimeZone, Utc};
    use pagination::Page;
    use rstest::rstest;
    use serde_json::Value;

    const RECIPE: &str = "64b1f0a2c3d4e5f6012345c1";
    const CATEGORY_ID: &str = "64b1f0a2c3d4e5f6012345d1";

    fn view(id: &str, title: &str) -> RecipeView {
        RecipeView {
            id: record_id(id),
            title: title.to_owned(),
            description: "Simple".to_owned(),
            instructions: "Cook.".to_owned(),
            image: None,
            cooking_time: Some(20),
            category: None,
            area: None,
            author: None,
            ingredients: Vec::new(),
            favorited_by: Vec::new(),
            popularity: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date"),
        }
    }

    fn recipes_scope() -> actix_web::Scope {
        web::scope("/api")
            .service(list_recipes)
            .service(popular_recipes)
            .service(get_recipe)
    }

    async fn get_json(ports: MockPorts, uri: &str) -> (StatusCode, Value) {
        let app =
            test::init_service(App::new().app_data(ports.into_state()).service(recipes_scope()))
                .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn list_applies_defaults_and_filters() {
        let mut ports = MockPorts::default();
        ports
            .recipes
            .expect_list()
            .withf(|filter, page| {
                filter.category == Some(record_id(CATEGORY_ID))
                    && filter.search.as_deref() == Some("pie")
                    && filter.area.is_none()
                    && page.page() == 1
                    && page.limit() == 12
            })
            .times(1)
            .return_once(|_, page| Ok(Page::new(vec![view(RECIPE, "Apple pie")], page, 13)));

        let uri = format!("/api/recipes?category={CATEGORY_ID}&search=pie&page=abc");
        let (status, body) = get_json(ports, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(
            body["pagination"],
            serde_json::json!({"page": 1, "limit": 12, "total": 13, "totalPages": 2})
        );
        assert_eq!(body["data"][0]["title"], "Apple pie");
    }

    #[rstest]
    #[actix_web::test]
    async fn list_clamps_oversized_limits() {
        let mut ports = MockPorts::default();
        ports
            .recipes
            .expect_list()
            .withf(|_, page| page.page() == 3 && page.limit() == 100)
            .times(1)
            .return_once(|_, page| Ok(Page::new(Vec::new(), page, 0)));

        let (status, body) = get_json(ports, "/api/recipes?page=3&limit=5000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_filter_id_is_rejected_before_querying() {
        let (status, body) = get_json(MockPorts::default(), "/api/recipes?area=italy").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["details"]["field"], "area");
    }

    #[rstest]
    #[case("/api/recipes/popular", POPULAR_DEFAULT_LIMIT)]
    #[case("/api/recipes/popular?limit=2", 2)]
    #[case("/api/recipes/popular?limit=0", POPULAR_DEFAULT_LIMIT)]
    #[case("/api/recipes/popular?limit=900", 100)]
    #[actix_web::test]
    async fn popular_resolves_limit(#[case] uri: &str, #[case] expected: u32) {
        let mut ports = MockPorts::default();
        ports
            .recipes
            .expect_popular()
            .withf(move |limit| *limit == expected)
            .times(1)
            .return_once(|_| Ok(vec![view(RECIPE, "Soup")]));

        let (status, body) = get_json(ports, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn detail_returns_populated_recipe() {
        let mut ports = MockPorts::default();
        ports
            .recipes
            .expect_detail()
            .withf(|id| *id == record_id(RECIPE))
            .times(1)
            .return_once(|_| Ok(view(RECIPE, "Soup")));

        let (status, body) = get_json(ports, &format!("/api/recipes/{RECIPE}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], RECIPE);
        assert_eq!(body["data"]["cookingTime"], 20);
    }

    #[rstest]
    #[actix_web::test]
    async fn detail_maps_missing_recipe_to_404() {
        let mut ports = MockPorts::default();
        ports
            .recipes
            .expect_detail()
            .times(1)
            .return_once(|_| Err(Error::not_found("Recipe not found")));

        let (status, body) = get_json(ports, &format!("/api/recipes/{RECIPE}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Recipe not found");
    }

    #[rstest]
    #[actix_web::test]
    async fn detail_rejects_malformed_id() {
        let (status, body) = get_json(MockPorts::default(), "/api/recipes/123").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }
}

//! HTTP inbound adapter exposing the read API.

pub mod catalogue;
pub mod envelope;
pub mod error;
pub mod health;
pub mod recipes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::{Scope, web};

use crate::domain::Error;

pub use error::ApiResult;

/// The `/api` scope with every read endpoint registered.
///
/// Query strings that fail to deserialize produce the standard error
/// envelope rather than Actix's plain-text response.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _| Error::invalid_request(err.to_string()).into()),
        )
        .service(health::api_health)
        .service(catalogue::list_categories)
        .service(catalogue::get_category)
        .service(catalogue::list_areas)
        .service(catalogue::get_area)
        .service(catalogue::list_ingredients)
        .service(catalogue::get_ingredient)
        .service(catalogue::list_testimonials)
        .service(recipes::list_recipes)
        .service(recipes::popular_recipes)
        .service(recipes::get_recipe)
        .service(users::get_user)
}

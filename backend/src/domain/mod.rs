//! Domain primitives, aggregates and services.
//!
//! Purpose: Define the strongly typed entities shared by the importer, the
//! read API and the persistence adapters, plus the services that implement
//! the driving ports. Adapters live outside this module and reach it only
//! through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - RecordId: 12-byte document identifier rendered as 24 hex characters.
//! - Category, Area, Ingredient, Testimonial, User, Recipe: stored entities.
//! - FixtureImporter: clears the store and imports a fixture set.

pub mod catalogue;
pub mod catalogue_service;
pub mod error;
pub mod import;
pub mod ports;
pub mod recipe;
pub mod recipe_command_service;
pub mod recipe_service;
pub mod record_id;
pub mod social_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::catalogue::{
    Area, Category, Ingredient, IngredientSummary, NamedRef, NewIngredient, NewNamed,
    NewTestimonial, TESTIMONIAL_TEXT_MAX, Testimonial, TestimonialView,
};
pub use self::catalogue_service::{
    AREA_NOT_FOUND, CATEGORY_NOT_FOUND, CatalogueService, INGREDIENT_NOT_FOUND,
};
pub use self::error::{Error, ErrorCode};
pub use self::import::{
    FixtureImporter, ImportError, ImportOptions, ImportReport, SkipReason, SkippedRecipe,
};
pub use self::recipe::{
    DESCRIPTION_MAX, INSTRUCTIONS_MAX, IngredientRef, NewRecipe, Recipe, RecipeFilter,
    RecipeIngredient, RecipeIngredientView, RecipeValidationError, RecipeView, TITLE_MAX,
};
pub use self::recipe_command_service::{
    DELETE_FORBIDDEN, IngredientInput, RecipeChanges, RecipeCommandService, RecipeDraft,
    UPDATE_FORBIDDEN,
};
pub use self::recipe_service::RecipeService;
pub use self::record_id::RecordId;
pub use self::social_service::{FavoritesService, FollowService};
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, PasswordHash, User, UserProfile, UserSummary};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Recipe not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

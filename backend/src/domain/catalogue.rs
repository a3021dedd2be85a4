//! Reference entities: categories, areas, ingredients and testimonials.
//!
//! Categories and areas are looked up by name when recipes are imported and
//! rendered as `{id, name}` pairs when recipes are read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{RecordId, UserSummary};

/// Recipe category such as "Dessert".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[schema(value_type = String, example = "64b1f0a2c3d4e5f601234567")]
    pub id: RecordId,
    #[schema(example = "Dessert")]
    pub name: String,
}

/// Cuisine region such as "Italian".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Area {
    #[schema(value_type = String, example = "64b1f0a2c3d4e5f601234568")]
    pub id: RecordId,
    #[schema(example = "Italian")]
    pub name: String,
}

/// Category or area payload before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNamed {
    pub name: String,
}

impl NewNamed {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ingredient document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[schema(example = "Basil")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ingredient payload before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Ingredient fields embedded in populated recipe ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientSummary {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub name: String,
    pub image: Option<String>,
}

impl From<Ingredient> for IngredientSummary {
    fn from(value: Ingredient) -> Self {
        Self {
            id: value.id,
            name: value.name,
            image: value.image,
        }
    }
}

/// `{id, name}` pair used for populated category and area references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NamedRef {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub name: String,
}

impl From<Category> for NamedRef {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<Area> for NamedRef {
    fn from(value: Area) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

/// Maximum testimonial length in characters.
pub const TESTIMONIAL_TEXT_MAX: usize = 500;

/// Stored testimonial; `owner` may be absent or dangling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testimonial {
    pub id: RecordId,
    pub text: String,
    pub name: String,
    pub owner: Option<RecordId>,
    pub created_at: DateTime<Utc>,
}

/// Testimonial payload before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestimonial {
    pub text: String,
    pub name: String,
    pub owner: Option<RecordId>,
}

/// Testimonial with its owner populated; `owner` is `None` when the owner is
/// absent or no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialView {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub text: String,
    pub name: String,
    pub owner: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

//! Recipes: stored documents, insertion payloads and populated read models.
//!
//! A stored recipe references its category, area and author by identifier.
//! Readers populate those references and tolerate dangling ones: a deleted
//! category renders as `null`, never as an error.

use chrono::{DateTime, Utc};
use seed_fixtures::{IngredientKey, RecipeIngredient as FixtureIngredient};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{IngredientSummary, NamedRef, RecordId, UserSummary};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 1000;
/// Maximum instructions length in characters.
pub const INSTRUCTIONS_MAX: usize = 5000;

/// Ingredient reference: an ingredient identifier or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientRef {
    Id(RecordId),
    Text(String),
}

impl IngredientRef {
    /// The identifier, when the reference is resolved.
    pub fn id(&self) -> Option<RecordId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Text(_) => None,
        }
    }

    /// Whether the reference matches a filter value, compared as text.
    pub fn matches(&self, needle: &str) -> bool {
        match self {
            Self::Id(id) => id.to_string().eq_ignore_ascii_case(needle.trim()),
            Self::Text(text) => text == needle,
        }
    }
}

impl From<IngredientKey> for IngredientRef {
    fn from(value: IngredientKey) -> Self {
        match value {
            IngredientKey::Id(id) => Self::Id(id.into()),
            IngredientKey::Text(text) => Self::Text(text),
        }
    }
}

/// One stored recipe ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    #[schema(value_type = String, example = "cheese")]
    pub ingredient_ref: IngredientRef,
    pub name: String,
    #[schema(example = "1 unit")]
    pub measure: String,
}

impl From<FixtureIngredient> for RecipeIngredient {
    fn from(value: FixtureIngredient) -> Self {
        Self {
            ingredient_ref: value.ingredient_ref.into(),
            name: value.name,
            measure: value.measure,
        }
    }
}

/// Validation failures for [`NewRecipe`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeValidationError {
    #[error("title cannot be more than {TITLE_MAX} characters")]
    TitleTooLong,
    #[error("description cannot be more than {DESCRIPTION_MAX} characters")]
    DescriptionTooLong,
    #[error("instructions cannot be more than {INSTRUCTIONS_MAX} characters")]
    InstructionsTooLong,
    #[error("cooking time must be at least 1 minute")]
    CookingTimeTooShort,
}

/// Recipe payload before insertion, with every reference resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub category: RecordId,
    pub area: RecordId,
    pub ingredients: Vec<RecipeIngredient>,
    pub author: RecordId,
    pub favorited_by: Vec<RecordId>,
    pub created_at: DateTime<Utc>,
}

fn check_limits(
    title: &str,
    description: &str,
    instructions: &str,
    cooking_time: Option<i32>,
) -> Result<(), RecipeValidationError> {
    if title.chars().count() > TITLE_MAX {
        return Err(RecipeValidationError::TitleTooLong);
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(RecipeValidationError::DescriptionTooLong);
    }
    if instructions.chars().count() > INSTRUCTIONS_MAX {
        return Err(RecipeValidationError::InstructionsTooLong);
    }
    if cooking_time.is_some_and(|minutes| minutes < 1) {
        return Err(RecipeValidationError::CookingTimeTooShort);
    }
    Ok(())
}

impl NewRecipe {
    /// Check the persisted field limits.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        check_limits(
            &self.title,
            &self.description,
            &self.instructions,
            self.cooking_time,
        )
    }
}

/// Stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub category: RecordId,
    pub area: RecordId,
    pub ingredients: Vec<RecipeIngredient>,
    pub author: RecordId,
    pub favorited_by: Vec<RecordId>,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Materialise a stored recipe from its insertion payload.
    pub fn from_new(id: RecordId, recipe: NewRecipe) -> Self {
        Self {
            id,
            title: recipe.title,
            description: recipe.description,
            instructions: recipe.instructions,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
            category: recipe.category,
            area: recipe.area,
            ingredients: recipe.ingredients,
            author: recipe.author,
            favorited_by: recipe.favorited_by,
            created_at: recipe.created_at,
        }
    }

    /// Check the persisted field limits after an edit.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        check_limits(
            &self.title,
            &self.description,
            &self.instructions,
            self.cooking_time,
        )
    }

    /// Number of users who favorited the recipe.
    pub fn popularity(&self) -> usize {
        self.favorited_by.len()
    }

    /// Whether the recipe satisfies every set field of `filter`.
    pub fn matches(&self, filter: &RecipeFilter) -> bool {
        filter.category.is_none_or(|id| id == self.category)
            && filter.area.is_none_or(|id| id == self.area)
            && filter.author.is_none_or(|id| id == self.author)
            && filter.ingredient.as_deref().is_none_or(|needle| {
                self.ingredients
                    .iter()
                    .any(|entry| entry.ingredient_ref.matches(needle))
            })
            && filter.search.as_deref().is_none_or(|needle| {
                let needle = needle.to_lowercase();
                [&self.title, &self.description, &self.instructions]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
    }
}

/// Optional filters for recipe listings. Search is a case-insensitive
/// literal substring over title, description and instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub category: Option<RecordId>,
    pub area: Option<RecordId>,
    pub ingredient: Option<String>,
    pub author: Option<RecordId>,
    pub search: Option<String>,
}

/// Recipe ingredient with the referenced ingredient populated when it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientView {
    #[schema(value_type = String)]
    pub ingredient_ref: IngredientRef,
    pub name: String,
    pub measure: String,
    pub ingredient: Option<IngredientSummary>,
}

/// Recipe with category, area, author and ingredients populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub category: Option<NamedRef>,
    pub area: Option<NamedRef>,
    pub author: Option<UserSummary>,
    pub ingredients: Vec<RecipeIngredientView>,
    #[schema(value_type = Vec<String>)]
    pub favorited_by: Vec<RecordId>,
    pub popularity: usize,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn new_recipe() -> NewRecipe {
        NewRecipe {
            title: "Pizza".to_owned(),
            description: "A delicious pizza recipe.".to_owned(),
            instructions: "Bake.".to_owned(),
            image: None,
            cooking_time: Some(30),
            category: RecordId::generate(),
            area: RecordId::generate(),
            ingredients: vec![RecipeIngredient {
                ingredient_ref: IngredientRef::Text("cheese".to_owned()),
                name: "cheese".to_owned(),
                measure: "1 unit".to_owned(),
            }],
            author: RecordId::generate(),
            favorited_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_recipe_passes(new_recipe: NewRecipe) {
        assert_eq!(new_recipe.validate(), Ok(()));
    }

    #[rstest]
    #[case(|r: &mut NewRecipe| r.title = "t".repeat(TITLE_MAX + 1), RecipeValidationError::TitleTooLong)]
    #[case(
        |r: &mut NewRecipe| r.description = "d".repeat(DESCRIPTION_MAX + 1),
        RecipeValidationError::DescriptionTooLong
    )]
    #[case(
        |r: &mut NewRecipe| r.instructions = "i".repeat(INSTRUCTIONS_MAX + 1),
        RecipeValidationError::InstructionsTooLong
    )]
    #[case(|r: &mut NewRecipe| r.cooking_time = Some(0), RecipeValidationError::CookingTimeTooShort)]
    fn limits_are_enforced(
        mut new_recipe: NewRecipe,
        #[case] breaks: fn(&mut NewRecipe),
        #[case] expected: RecipeValidationError,
    ) {
        breaks(&mut new_recipe);
        assert_eq!(new_recipe.validate(), Err(expected));
    }

    #[rstest]
    fn filters_match_on_every_field(new_recipe: NewRecipe) {
        let recipe = Recipe::from_new(RecordId::generate(), new_recipe);
        let matching = RecipeFilter {
            category: Some(recipe.category),
            area: Some(recipe.area),
            ingredient: Some("cheese".to_owned()),
            author: Some(recipe.author),
            search: Some("PIZ".to_owned()),
        };
        assert!(recipe.matches(&matching));
        assert!(recipe.matches(&RecipeFilter::default()));

        let other_area = RecipeFilter {
            area: Some(RecordId::generate()),
            ..RecipeFilter::default()
        };
        assert!(!recipe.matches(&other_area));
    }

    #[rstest]
    fn ingredient_refs_serialize_as_plain_strings() {
        let id = RecordId::parse("64b1f0a2c3d4e5f601234567").expect("valid id");
        assert_eq!(
            serde_json::to_value(IngredientRef::Id(id)).expect("serialize"),
            serde_json::json!("64b1f0a2c3d4e5f601234567")
        );
        assert_eq!(
            serde_json::to_value(IngredientRef::Text("salt".to_owned())).expect("serialize"),
            serde_json::json!("salt")
        );
    }
}

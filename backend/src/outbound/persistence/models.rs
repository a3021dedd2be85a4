//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations, and convert to domain types
//! at the adapter boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Area, Category, Ingredient, NewRecipe, Recipe, RecipeIngredient, RecordId, Testimonial, User,
};

use super::schema::{areas, categories, ingredients, recipes, testimonials, users};

/// Parse a stored identifier column.
pub(crate) fn parse_id(value: &str, column: &str) -> Result<RecordId, String> {
    RecordId::parse(value).map_err(|err| format!("{column}: {err}"))
}

fn parse_ids(values: &[String], column: &str) -> Result<Vec<RecordId>, String> {
    values.iter().map(|value| parse_id(value, column)).collect()
}

/// Render identifiers for an array column.
pub(crate) fn id_strings(ids: &[RecordId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// Catalogue models
// ---------------------------------------------------------------------------

/// Row struct shared by the categories and areas tables.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: String,
    pub name: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = String;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&row.id, "categories.id")?,
            name: row.name,
        })
    }
}

/// Row struct for reading from the areas table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = areas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AreaRow {
    pub id: String,
    pub name: String,
}

impl TryFrom<AreaRow> for Area {
    type Error = String;

    fn try_from(row: AreaRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&row.id, "areas.id")?,
            name: row.name,
        })
    }
}

/// Insertable struct for categories.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow {
    pub id: String,
    pub name: String,
}

/// Insertable struct for areas.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = areas)]
pub(crate) struct NewAreaRow {
    pub id: String,
    pub name: String,
}

/// Row struct for reading and inserting ingredients.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = String;

    fn try_from(row: IngredientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&row.id, "ingredients.id")?,
            name: row.name,
            image: row.image,
            description: row.description,
        })
    }
}

/// Row struct for reading testimonials.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = testimonials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TestimonialRow {
    pub id: String,
    pub text: String,
    pub name: String,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TestimonialRow> for Testimonial {
    type Error = String;

    fn try_from(row: TestimonialRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&row.id, "testimonials.id")?,
            text: row.text,
            name: row.name,
            owner: row
                .owner_id
                .as_deref()
                .map(|owner| parse_id(owner, "testimonials.owner_id"))
                .transpose()?,
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for testimonials.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = testimonials)]
pub(crate) struct NewTestimonialRow {
    pub id: String,
    pub text: String,
    pub name: String,
    pub owner_id: Option<String>,
}

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading users without their password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&row.id, "users.id")?,
            name: row.name,
            email: row.email,
            avatar: row.avatar,
            followers: parse_ids(&row.followers, "users.followers")?,
            following: parse_ids(&row.following, "users.following")?,
        })
    }
}

/// Insertable struct for creating users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Recipe models
// ---------------------------------------------------------------------------

/// Row struct for reading and inserting recipes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub category_id: String,
    pub area_id: String,
    pub author_id: String,
    pub ingredients: serde_json::Value,
    pub favorited_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl RecipeRow {
    /// Build an insertable row for `recipe` under a fresh identifier.
    pub(crate) fn from_new(id: RecordId, recipe: &NewRecipe) -> Result<Self, String> {
        Ok(Self {
            id: id.to_string(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            instructions: recipe.instructions.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
            category_id: recipe.category.to_string(),
            area_id: recipe.area.to_string(),
            author_id: recipe.author.to_string(),
            ingredients: serde_json::to_value(&recipe.ingredients)
                .map_err(|err| format!("recipes.ingredients: {err}"))?,
            favorited_by: id_strings(&recipe.favorited_by),
            created_at: recipe.created_at,
        })
    }
}

/// Editable recipe columns. `None` clears the nullable ones.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeChangeset {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub category_id: String,
    pub area_id: String,
    pub ingredients: serde_json::Value,
}

impl TryFrom<&Recipe> for RecipeChangeset {
    type Error = String;

    fn try_from(recipe: &Recipe) -> Result<Self, Self::Error> {
        Ok(Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            instructions: recipe.instructions.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
            category_id: recipe.category.to_string(),
            area_id: recipe.area.to_string(),
            ingredients: serde_json::to_value(&recipe.ingredients)
                .map_err(|err| format!("recipes.ingredients: {err}"))?,
        })
    }
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = String;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let ingredients: Vec<RecipeIngredient> = serde_json::from_value(row.ingredients)
            .map_err(|err| format!("recipes.ingredients: {err}"))?;
        Ok(Self {
            id: parse_id(&row.id, "recipes.id")?,
            title: row.title,
            description: row.description,
            instructions: row.instructions,
            image: row.image,
            cooking_time: row.cooking_time,
            category: parse_id(&row.category_id, "recipes.category_id")?,
            area: parse_id(&row.area_id, "recipes.area_id")?,
            ingredients,
            author: parse_id(&row.author_id, "recipes.author_id")?,
            favorited_by: parse_ids(&row.favorited_by, "recipes.favorited_by")?,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversions.
    use super::*;
    use crate::domain::IngredientRef;
    use rstest::rstest;

    #[rstest]
    fn recipe_rows_round_trip_through_the_domain() {
        let cheese = RecordId::generate();
        let new = NewRecipe {
            title: "Pizza".to_owned(),
            description: "A delicious pizza recipe.".to_owned(),
            instructions: "Bake.".to_owned(),
            image: None,
            cooking_time: Some(25),
            category: RecordId::generate(),
            area: RecordId::generate(),
            ingredients: vec![
                RecipeIngredient {
                    ingredient_ref: IngredientRef::Id(cheese),
                    name: "Cheese".to_owned(),
                    measure: "200 g".to_owned(),
                },
                RecipeIngredient {
                    ingredient_ref: IngredientRef::Text("basil".to_owned()),
                    name: "basil".to_owned(),
                    measure: "1 unit".to_owned(),
                },
            ],
            author: RecordId::generate(),
            favorited_by: vec![RecordId::generate()],
            created_at: Utc::now(),
        };
        let id = RecordId::generate();

        let row = RecipeRow::from_new(id, &new).expect("row builds");
        assert_eq!(
            row.ingredients,
            serde_json::json!([
                {"ingredientRef": cheese.to_string(), "name": "Cheese", "measure": "200 g"},
                {"ingredientRef": "basil", "name": "basil", "measure": "1 unit"},
            ])
        );

        let recipe = Recipe::try_from(row).expect("row converts");
        assert_eq!(recipe, Recipe::from_new(id, new));
    }

    #[rstest]
    fn malformed_identifiers_are_reported_with_their_column() {
        let row = UserRow {
            id: "not-an-id".to_owned(),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            avatar: None,
            followers: Vec::new(),
            following: Vec::new(),
        };
        let err = User::try_from(row).expect_err("id is malformed");
        assert!(err.starts_with("users.id"));
    }
}

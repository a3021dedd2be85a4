//! Recipe authoring commands: create, edit and delete.
//!
//! Only the author may edit or delete a recipe. Ingredient entries submitted
//! by a client carry a name and a measure; the name doubles as the stored
//! free-text reference.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::domain::ports::RecipeRepository;
use crate::domain::recipe_service::RECIPE_NOT_FOUND;
use crate::domain::{Error, IngredientRef, NewRecipe, Recipe, RecipeIngredient, RecordId};

/// Refusal for edits by anyone other than the author.
pub const UPDATE_FORBIDDEN: &str = "Not authorized to update this recipe";
/// Refusal for deletes by anyone other than the author.
pub const DELETE_FORBIDDEN: &str = "Not authorized to delete this recipe";

/// Ingredient line as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientInput {
    pub name: String,
    pub measure: String,
}

impl From<IngredientInput> for RecipeIngredient {
    fn from(value: IngredientInput) -> Self {
        Self {
            ingredient_ref: IngredientRef::Text(value.name.clone()),
            name: value.name,
            measure: value.measure,
        }
    }
}

/// Fields of a recipe being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub category: RecordId,
    pub area: RecordId,
    pub ingredients: Vec<IngredientInput>,
}

/// Partial edit; unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub category: Option<RecordId>,
    pub area: Option<RecordId>,
    pub ingredients: Option<Vec<IngredientInput>>,
}

fn require(value: &str, message: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(message));
    }
    Ok(())
}

fn require_text(title: &str, description: &str, instructions: &str) -> Result<(), Error> {
    require(title, "Please add a title")?;
    require(description, "Please add a description")?;
    require(instructions, "Please add instructions")
}

fn ingredient_lines(inputs: Vec<IngredientInput>) -> Result<Vec<RecipeIngredient>, Error> {
    inputs
        .into_iter()
        .map(|input| {
            require(&input.measure, "Please add ingredient measure")?;
            Ok(input.into())
        })
        .collect()
}

/// Creates, edits and deletes recipes on behalf of their authors.
#[derive(Clone)]
pub struct RecipeCommandService<R> {
    recipes: Arc<R>,
}

impl<R> RecipeCommandService<R> {
    /// Create a new service over the recipe repository.
    pub fn new(recipes: Arc<R>) -> Self {
        Self { recipes }
    }
}

impl<R: RecipeRepository> RecipeCommandService<R> {
    /// Store a new recipe written by `author`.
    ///
    /// # Errors
    ///
    /// Invalid request when a required field is blank, an ingredient has no
    /// measure, or a field exceeds its limit.
    pub async fn create(&self, author: RecordId, draft: RecipeDraft) -> Result<Recipe, Error> {
        require_text(&draft.title, &draft.description, &draft.instructions)?;
        let new = NewRecipe {
            title: draft.title,
            description: draft.description,
            instructions: draft.instructions,
            image: draft.image,
            cooking_time: draft.cooking_time,
            category: draft.category,
            area: draft.area,
            ingredients: ingredient_lines(draft.ingredients)?,
            author,
            favorited_by: Vec::new(),
            created_at: Utc::now(),
        };
        new.validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let recipe = self.recipes.create(new).await?;
        debug!(recipe = %recipe.id, %author, "recipe created");
        Ok(recipe)
    }

    /// Apply `changes` to a recipe written by `actor`.
    ///
    /// # Errors
    ///
    /// Not found when the recipe does not exist; unauthorized when `actor` is
    /// not the author; invalid request when the edited recipe fails
    /// validation.
    pub async fn update(
        &self,
        actor: RecordId,
        id: RecordId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error> {
        let mut recipe = self.owned(actor, id, UPDATE_FORBIDDEN).await?;
        let RecipeChanges {
            title,
            description,
            instructions,
            image,
            cooking_time,
            category,
            area,
            ingredients,
        } = changes;
        recipe.title = title.unwrap_or(recipe.title);
        recipe.description = description.unwrap_or(recipe.description);
        recipe.instructions = instructions.unwrap_or(recipe.instructions);
        recipe.image = image.or(recipe.image);
        recipe.cooking_time = cooking_time.or(recipe.cooking_time);
        recipe.category = category.unwrap_or(recipe.category);
        recipe.area = area.unwrap_or(recipe.area);
        if let Some(inputs) = ingredients {
            recipe.ingredients = ingredient_lines(inputs)?;
        }
        require_text(&recipe.title, &recipe.description, &recipe.instructions)?;
        recipe
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        if !self.recipes.update(&recipe).await? {
            return Err(Error::not_found(RECIPE_NOT_FOUND));
        }
        debug!(%id, %actor, "recipe updated");
        Ok(recipe)
    }

    /// Delete a recipe written by `actor`.
    ///
    /// # Errors
    ///
    /// Not found when the recipe does not exist; unauthorized when `actor` is
    /// not the author.
    pub async fn delete(&self, actor: RecordId, id: RecordId) -> Result<(), Error> {
        self.owned(actor, id, DELETE_FORBIDDEN).await?;
        if !self.recipes.delete(id).await? {
            return Err(Error::not_found(RECIPE_NOT_FOUND));
        }
        debug!(%id, %actor, "recipe deleted");
        Ok(())
    }

    async fn owned(&self, actor: RecordId, id: RecordId, refusal: &str) -> Result<Recipe, Error> {
        let recipe = self
            .recipes
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found(RECIPE_NOT_FOUND))?;
        if recipe.author != actor {
            return Err(Error::unauthorized(refusal));
        }
        Ok(recipe)
    }
}

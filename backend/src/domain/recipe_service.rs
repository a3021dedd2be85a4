//! Recipe read service.
//!
//! Stored recipes reference their category, area, author and ingredients by
//! identifier. The service loads each referenced set once per page and joins
//! in memory; references that no longer resolve render as `None`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{MAX_LIMIT, Page, PageRequest};

use crate::domain::ports::{CatalogueRepository, RecipeQuery, RecipeRepository, UserRepository};
use crate::domain::{
    Error, IngredientSummary, NamedRef, Recipe, RecipeFilter, RecipeIngredientView, RecipeView,
    RecordId, UserSummary,
};

/// Message returned when a recipe identifier does not resolve.
pub const RECIPE_NOT_FOUND: &str = "Recipe not found";

/// Recipe service implementing [`RecipeQuery`].
#[derive(Clone)]
pub struct RecipeService<R, C, U> {
    recipes: Arc<R>,
    catalogue: Arc<C>,
    users: Arc<U>,
}

impl<R, C, U> RecipeService<R, C, U> {
    /// Create a new service over the given repositories.
    pub fn new(recipes: Arc<R>, catalogue: Arc<C>, users: Arc<U>) -> Self {
        Self {
            recipes,
            catalogue,
            users,
        }
    }
}

/// Referenced records for a set of recipes, keyed by identifier.
#[derive(Default)]
struct References {
    categories: HashMap<RecordId, NamedRef>,
    areas: HashMap<RecordId, NamedRef>,
    ingredients: HashMap<RecordId, IngredientSummary>,
    authors: HashMap<RecordId, UserSummary>,
}

fn distinct(ids: impl IntoIterator<Item = RecordId>) -> Vec<RecordId> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

impl References {
    fn view(&self, recipe: Recipe) -> RecipeView {
        let popularity = recipe.popularity();
        RecipeView {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            instructions: recipe.instructions,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
            category: self.categories.get(&recipe.category).cloned(),
            area: self.areas.get(&recipe.area).cloned(),
            author: self.authors.get(&recipe.author).cloned(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(|entry| RecipeIngredientView {
                    ingredient: entry
                        .ingredient_ref
                        .id()
                        .and_then(|id| self.ingredients.get(&id).cloned()),
                    ingredient_ref: entry.ingredient_ref,
                    name: entry.name,
                    measure: entry.measure,
                })
                .collect(),
            favorited_by: recipe.favorited_by,
            popularity,
            created_at: recipe.created_at,
        }
    }
}

impl<R, C, U> RecipeService<R, C, U>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
{
    async fn references(&self, recipes: &[Recipe]) -> Result<References, Error> {
        if recipes.is_empty() {
            return Ok(References::default());
        }
        let category_ids = distinct(recipes.iter().map(|recipe| recipe.category));
        let area_ids = distinct(recipes.iter().map(|recipe| recipe.area));
        let author_ids = distinct(recipes.iter().map(|recipe| recipe.author));
        let ingredient_ids = distinct(
            recipes
                .iter()
                .flat_map(|recipe| recipe.ingredients.iter())
                .filter_map(|entry| entry.ingredient_ref.id()),
        );

        let categories = self.catalogue.categories_by_ids(&category_ids).await?;
        let areas = self.catalogue.areas_by_ids(&area_ids).await?;
        let ingredients = if ingredient_ids.is_empty() {
            Vec::new()
        } else {
            self.catalogue.ingredients_by_ids(&ingredient_ids).await?
        };
        let authors = self.users.find_many(&author_ids).await?;

        Ok(References {
            categories: categories
                .into_iter()
                .map(|category| (category.id, NamedRef::from(category)))
                .collect(),
            areas: areas
                .into_iter()
                .map(|area| (area.id, NamedRef::from(area)))
                .collect(),
            ingredients: ingredients
                .into_iter()
                .map(|ingredient| (ingredient.id, IngredientSummary::from(ingredient)))
                .collect(),
            authors: authors
                .iter()
                .map(|user| (user.id, UserSummary::from(user)))
                .collect(),
        })
    }

    async fn populate(&self, recipes: Vec<Recipe>) -> Result<Vec<RecipeView>, Error> {
        let references = self.references(&recipes).await?;
        Ok(recipes
            .into_iter()
            .map(|recipe| references.view(recipe))
            .collect())
    }
}

#[async_trait]
impl<R, C, U> RecipeQuery for RecipeService<R, C, U>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, Error> {
        let (recipes, total) = self.recipes.list(&filter, page).await?;
        let views = self.populate(recipes).await?;
        Ok(Page::new(views, page, total))
    }

    async fn popular(&self, limit: u32) -> Result<Vec<RecipeView>, Error> {
        let recipes = self.recipes.popular(limit.clamp(1, MAX_LIMIT)).await?;
        self.populate(recipes).await
    }

    async fn detail(&self, id: RecordId) -> Result<RecipeView, Error> {
        let recipe = self
            .recipes
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found(RECIPE_NOT_FOUND))?;
        let mut views = self.populate(vec![recipe]).await?;
        views
            .pop()
            .ok_or_else(|| Error::internal("populated recipe went missing"))
    }
}

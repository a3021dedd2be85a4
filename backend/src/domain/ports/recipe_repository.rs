//! Port for recipe reads, authoring and favorite updates.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{NewRecipe, Recipe, RecipeFilter, RecordId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// A query or update failed.
        Query { message: String } => "recipe repository query failed: {message}",
    }
    domain {
        Connection => service_unavailable,
        Query => internal,
    }
}

/// Read, write and favorite access to stored recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// One page of recipes matching `filter`, newest first, together with the
    /// total number of matches.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), RecipeRepositoryError>;

    /// The `limit` most favorited recipes; ties go to the newest.
    async fn popular(&self, limit: u32) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// A single recipe.
    async fn find(&self, id: RecordId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Number of recipes written by `author`.
    async fn count_by_author(&self, author: RecordId) -> Result<u64, RecipeRepositoryError>;

    /// Store `recipe` under a fresh identifier.
    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, RecipeRepositoryError>;

    /// Overwrite the editable fields of a stored recipe. Authorship,
    /// favorites and creation time are left untouched. Returns `false` when
    /// the recipe is missing.
    async fn update(&self, recipe: &Recipe) -> Result<bool, RecipeRepositoryError>;

    /// Remove a recipe. Returns `false` when nothing was deleted.
    async fn delete(&self, id: RecordId) -> Result<bool, RecipeRepositoryError>;

    /// Add `user` to the recipe's favorites in one atomic update. Returns
    /// `false` when the user was already present or the recipe is missing.
    async fn add_favorite(
        &self,
        recipe: RecordId,
        user: RecordId,
    ) -> Result<bool, RecipeRepositoryError>;

    /// Remove `user` from the recipe's favorites in one atomic update.
    /// Returns `false` when nothing changed.
    async fn remove_favorite(
        &self,
        recipe: RecordId,
        user: RecordId,
    ) -> Result<bool, RecipeRepositoryError>;
}

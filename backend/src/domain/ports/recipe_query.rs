//! Driving port for populated recipe reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, RecipeFilter, RecipeView, RecordId};

/// Use-case port behind the recipe endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// One page of populated recipes matching `filter`, newest first.
    async fn list(&self, filter: RecipeFilter, page: PageRequest)
    -> Result<Page<RecipeView>, Error>;

    /// The most favorited recipes.
    async fn popular(&self, limit: u32) -> Result<Vec<RecipeView>, Error>;

    /// A single populated recipe; `not_found` when absent.
    async fn detail(&self, id: RecordId) -> Result<RecipeView, Error>;
}

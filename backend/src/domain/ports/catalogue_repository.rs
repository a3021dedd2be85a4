//! Port for reading reference entities.

use async_trait::async_trait;

use crate::domain::{Area, Category, Ingredient, RecordId, Testimonial};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// A query failed.
        Query { message: String } => "catalogue repository query failed: {message}",
    }
    domain {
        Connection => service_unavailable,
        Query => internal,
    }
}

/// Read access to categories, areas, ingredients and testimonials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueRepositoryError>;

    /// All areas ordered by name.
    async fn list_areas(&self) -> Result<Vec<Area>, CatalogueRepositoryError>;

    /// All ingredients ordered by name.
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    /// All testimonials, newest first.
    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, CatalogueRepositoryError>;

    /// Categories with the given ids; unknown ids are absent from the result.
    async fn categories_by_ids(
        &self,
        ids: &[RecordId],
    ) -> Result<Vec<Category>, CatalogueRepositoryError>;

    /// Areas with the given ids; unknown ids are absent from the result.
    async fn areas_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Area>, CatalogueRepositoryError>;

    /// Ingredients with the given ids; unknown ids are absent from the result.
    async fn ingredients_by_ids(
        &self,
        ids: &[RecordId],
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;
}

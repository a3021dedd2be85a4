//! Driving port for reference-data listings.

use async_trait::async_trait;

use crate::domain::{Area, Category, Error, Ingredient, RecordId, TestimonialView};

/// Use-case port behind the category, area, ingredient and testimonial
/// endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// All categories ordered by name.
    async fn categories(&self) -> Result<Vec<Category>, Error>;

    /// All areas ordered by name.
    async fn areas(&self) -> Result<Vec<Area>, Error>;

    /// All ingredients ordered by name.
    async fn ingredients(&self) -> Result<Vec<Ingredient>, Error>;

    /// A single category; `not_found` when absent.
    async fn category(&self, id: RecordId) -> Result<Category, Error>;

    /// A single area; `not_found` when absent.
    async fn area(&self, id: RecordId) -> Result<Area, Error>;

    /// A single ingredient; `not_found` when absent.
    async fn ingredient(&self, id: RecordId) -> Result<Ingredient, Error>;

    /// Testimonials, newest first, with owners populated.
    async fn testimonials(&self) -> Result<Vec<TestimonialView>, Error>;
}

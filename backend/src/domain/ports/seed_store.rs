//! Port for the destructive bulk writes performed by a seed run.
//!
//! The store assigns fresh identifiers to every inserted record and returns
//! the inserted records in input order, so callers can build lookups from
//! them.

use async_trait::async_trait;

use crate::domain::{
    Area, Category, Ingredient, NewIngredient, NewNamed, NewRecipe, NewTestimonial, NewUser,
    Recipe, RecordId, Testimonial, User,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by seed store adapters.
    pub enum SeedStoreError {
        /// The store could not be reached.
        Connection { message: String } => "seed store connection failed: {message}",
        /// A write or query failed.
        Query { message: String } => "seed store query failed: {message}",
    }
    domain {
        Connection => service_unavailable,
        Query => internal,
    }
}

/// Bulk write access used by the fixture importer.
///
/// Each `insert_*` call is one bulk write. Adapters must not reorder records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Delete every category, area, ingredient, user, recipe and testimonial.
    async fn clear_all(&self) -> Result<(), SeedStoreError>;

    /// Insert categories.
    async fn insert_categories(
        &self,
        categories: Vec<NewNamed>,
    ) -> Result<Vec<Category>, SeedStoreError>;

    /// Insert areas.
    async fn insert_areas(&self, areas: Vec<NewNamed>) -> Result<Vec<Area>, SeedStoreError>;

    /// Insert ingredients.
    async fn insert_ingredients(
        &self,
        ingredients: Vec<NewIngredient>,
    ) -> Result<Vec<Ingredient>, SeedStoreError>;

    /// Insert users with already hashed credentials.
    async fn insert_users(&self, users: Vec<NewUser>) -> Result<Vec<User>, SeedStoreError>;

    /// Insert testimonials.
    async fn insert_testimonials(
        &self,
        testimonials: Vec<NewTestimonial>,
    ) -> Result<Vec<Testimonial>, SeedStoreError>;

    /// Insert recipes whose references are already resolved.
    async fn insert_recipes(&self, recipes: Vec<NewRecipe>) -> Result<Vec<Recipe>, SeedStoreError>;

    /// Record that `follower` follows `followee`, updating both users.
    /// Existing edges are left as they are.
    async fn link_follow(
        &self,
        follower: RecordId,
        followee: RecordId,
    ) -> Result<(), SeedStoreError>;
}

//! PostgreSQL-backed catalogue read adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Area, Category, Ingredient, RecordId, Testimonial};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, map_pool_error_message,
};
use super::models::{AreaRow, CategoryRow, IngredientRow, TestimonialRow, id_strings};
use super::pool::{DbPool, PoolError};
use super::schema::{areas, categories, ingredients, testimonials};

/// Diesel-backed implementation of the catalogue read port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use backend::outbound::persistence::{DbPool, DieselCatalogueRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodies")).await?;
    /// let repository = DieselCatalogueRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    match classify_diesel_error(error, "catalogue read") {
        DieselFailure::Connection(message) => CatalogueRepositoryError::connection(message),
        DieselFailure::Query(message) => CatalogueRepositoryError::query(message),
    }
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by((categories::name, categories::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, CatalogueRepositoryError::query)
    }

    async fn list_areas(&self) -> Result<Vec<Area>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AreaRow> = areas::table
            .select(AreaRow::as_select())
            .order_by((areas::name, areas::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, CatalogueRepositoryError::query)
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .select(IngredientRow::as_select())
            .order_by((ingredients::name, ingredients::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, CatalogueRepositoryError::query)
    }

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TestimonialRow> = testimonials::table
            .select(TestimonialRow::as_select())
            .order_by((testimonials::created_at.desc(), testimonials::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, CatalogueRepositoryError::query)
    }

    async fn categories_by_ids(
        &self,
        ids: &[RecordId],
    ) -> Result<Vec<Category>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .filter(categories::id.eq_any(id_strings(ids)))
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, CatalogueRepositoryError::query)
    }

    async fn areas_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Area>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AreaRow> = areas::table
            .filter(areas::id.eq_any(id_strings(ids)))
            .select(AreaRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, CatalogueRepositoryError::query)
    }

    async fn ingredients_by_ids(
        &self,
        ids: &[RecordId],
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq_any(id_strings(ids)))
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, CatalogueRepositoryError::query)
    }
}

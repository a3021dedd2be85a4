//! PostgreSQL-backed recipe adapter.
//!
//! Listing filters are composed into a boxed query so the page and the total
//! count share one filter definition. Favourite changes are single guarded
//! array updates; edits touch only the editable columns.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Text};
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use serde_json::json;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{NewRecipe, Recipe, RecipeFilter, RecordId};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, contains_pattern, map_pool_error_message,
};
use super::models::{RecipeChangeset, RecipeRow};
use super::pool::{DbPool, PoolError};
use super::schema::recipes;

const ADD_FAVORITE_SQL: &str = r"
UPDATE recipes SET favorited_by = array_append(favorited_by, $2)
WHERE id = $1 AND NOT ($2 = ANY(favorited_by))
";

const REMOVE_FAVORITE_SQL: &str = r"
UPDATE recipes SET favorited_by = array_remove(favorited_by, $2)
WHERE id = $1 AND $2 = ANY(favorited_by)
";

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    RecipeRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    match classify_diesel_error(error, "recipe repository") {
        DieselFailure::Connection(message) => RecipeRepositoryError::connection(message),
        DieselFailure::Query(message) => RecipeRepositoryError::query(message),
    }
}

/// Ingredient filter value as stored: identifiers in canonical lowercase hex,
/// free text unchanged.
fn ingredient_needle(value: &str) -> String {
    RecordId::parse(value.trim()).map_or_else(|_| value.to_owned(), |id| id.to_string())
}

fn filtered(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(category) = filter.category {
        query = query.filter(recipes::category_id.eq(category.to_string()));
    }
    if let Some(area) = filter.area {
        query = query.filter(recipes::area_id.eq(area.to_string()));
    }
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author.to_string()));
    }
    if let Some(ingredient) = filter.ingredient.as_deref() {
        let needle = json!([{ "ingredientRef": ingredient_needle(ingredient) }]);
        query = query.filter(recipes::ingredients.contains(needle));
    }
    if let Some(search) = filter.search.as_deref() {
        let pattern = contains_pattern(search);
        query = query.filter(
            recipes::title
                .ilike(pattern.clone())
                .or(recipes::description.ilike(pattern.clone()))
                .or(recipes::instructions.ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), RecipeRepositoryError> {
        let offset = i64::try_from(page.offset())
            .map_err(|_| RecipeRepositoryError::query("page offset out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<RecipeRow> = filtered(filter)
            .select(RecipeRow::as_select())
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .limit(i64::from(page.limit()))
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let recipes = collect_rows(rows, RecipeRepositoryError::query)?;
        Ok((recipes, u64::try_from(total).unwrap_or_default()))
    }

    async fn popular(&self, limit: u32) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RecipeRow> = recipes::table
            .select(RecipeRow::as_select())
            .order_by((
                sql::<Integer>("cardinality(recipes.favorited_by)").desc(),
                recipes::created_at.desc(),
                recipes::id.desc(),
            ))
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, RecipeRepositoryError::query)
    }

    async fn find(&self, id: RecordId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.to_string())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Recipe::try_from)
            .transpose()
            .map_err(RecipeRepositoryError::query)
    }

    async fn count_by_author(&self, author: RecordId) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = recipes::table
            .filter(recipes::author_id.eq(author.to_string()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let id = RecordId::generate();
        let row = RecipeRow::from_new(id, &recipe).map_err(RecipeRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(recipes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Recipe::from_new(id, recipe))
    }

    async fn update(&self, recipe: &Recipe) -> Result<bool, RecipeRepositoryError> {
        let changes = RecipeChangeset::try_from(recipe).map_err(RecipeRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(recipes::table.find(recipe.id.to_string()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipes::table.find(id.to_string()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn add_favorite(
        &self,
        recipe: RecordId,
        user: RecordId,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = sql_query(ADD_FAVORITE_SQL)
            .bind::<Text, _>(recipe.to_string())
            .bind::<Text, _>(user.to_string())
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }

    async fn remove_favorite(
        &self,
        recipe: RecordId,
        user: RecordId,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = sql_query(REMOVE_FAVORITE_SQL)
            .bind::<Text, _>(recipe.to_string())
            .bind::<Text, _>(user.to_string())
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for query helpers.
    use super::*;
    use diesel::debug_query;
    use rstest::rstest;

    #[rstest]
    fn identifier_needles_are_canonicalised() {
        let id = RecordId::generate();
        assert_eq!(ingredient_needle(&id.to_string().to_uppercase()), id.to_string());
        assert_eq!(ingredient_needle("Cheese"), "Cheese");
    }

    #[rstest]
    fn unfiltered_listing_has_no_where_clause() {
        let query = filtered(&RecipeFilter::default());
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[rstest]
    fn edits_leave_authorship_and_favorites_alone() {
        let recipe = Recipe {
            id: RecordId::generate(),
            title: "Pizza".to_owned(),
            description: "A delicious pizza recipe.".to_owned(),
            instructions: "Bake.".to_owned(),
            image: None,
            cooking_time: None,
            category: RecordId::generate(),
            area: RecordId::generate(),
            ingredients: Vec::new(),
            author: RecordId::generate(),
            favorited_by: vec![RecordId::generate()],
            created_at: chrono::Utc::now(),
        };
        let changes = RecipeChangeset::try_from(&recipe).expect("changeset");
        let query = diesel::update(recipes::table.find(recipe.id.to_string())).set(&changes);
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"cooking_time\" = $"), "{sql}");
        assert!(!sql.contains("author_id"), "{sql}");
        assert!(!sql.contains("favorited_by"), "{sql}");
    }

    #[rstest]
    fn search_and_ingredient_filters_compose() {
        let filter = RecipeFilter {
            ingredient: Some("cheese".to_owned()),
            search: Some("50%".to_owned()),
            ..RecipeFilter::default()
        };
        let query = filtered(&filter);
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("ILIKE"), "{sql}");
        assert!(sql.contains("@>"), "{sql}");
    }
}

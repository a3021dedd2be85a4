//! PostgreSQL-backed seed store used by the fixture importer.
//!
//! Every `insert_*` call is one multi-row `INSERT`. Identifiers are generated
//! here, so the returned records mirror the input order exactly.

use async_trait::async_trait;
use chrono::Utc;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{SeedStore, SeedStoreError};
use crate::domain::{
    Area, Category, Ingredient, NewIngredient, NewNamed, NewRecipe, NewTestimonial, NewUser,
    Recipe, RecordId, Testimonial, User,
};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, map_pool_error_message,
};
use super::models::{
    IngredientRow, NewAreaRow, NewCategoryRow, NewTestimonialRow, NewUserRow, RecipeRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{areas, categories, ingredients, recipes, testimonials, users};

const APPEND_FOLLOWING_SQL: &str = r"
UPDATE users SET following = array_append(following, $2)
WHERE id = $1 AND NOT ($2 = ANY(following))
";

const APPEND_FOLLOWER_SQL: &str = r"
UPDATE users SET followers = array_append(followers, $2)
WHERE id = $1 AND NOT ($2 = ANY(followers))
";

/// Diesel-backed implementation of the [`SeedStore`] port.
#[derive(Clone)]
pub struct DieselSeedStore {
    pool: DbPool,
}

impl DieselSeedStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SeedStoreError {
    SeedStoreError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> SeedStoreError {
    match classify_diesel_error(error, "seed store write") {
        DieselFailure::Connection(message) => SeedStoreError::connection(message),
        DieselFailure::Query(message) => SeedStoreError::query(message),
    }
}

/// Append `followee` to the following list of `follower` and `follower` to
/// the followers list of `followee`. Returns the rows changed by the first
/// update.
pub(crate) async fn append_follow(
    conn: &mut AsyncPgConnection,
    follower: &str,
    followee: &str,
) -> Result<usize, diesel::result::Error> {
    let changed = sql_query(APPEND_FOLLOWING_SQL)
        .bind::<Text, _>(follower)
        .bind::<Text, _>(followee)
        .execute(conn)
        .await?;
    sql_query(APPEND_FOLLOWER_SQL)
        .bind::<Text, _>(followee)
        .bind::<Text, _>(follower)
        .execute(conn)
        .await?;
    Ok(changed)
}

#[async_trait]
impl SeedStore for DieselSeedStore {
    async fn clear_all(&self) -> Result<(), SeedStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(recipes::table).execute(conn).await?;
                diesel::delete(testimonials::table).execute(conn).await?;
                diesel::delete(ingredients::table).execute(conn).await?;
                diesel::delete(users::table).execute(conn).await?;
                diesel::delete(areas::table).execute(conn).await?;
                diesel::delete(categories::table).execute(conn).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_categories(
        &self,
        categories: Vec<NewNamed>,
    ) -> Result<Vec<Category>, SeedStoreError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let inserted: Vec<Category> = categories
            .into_iter()
            .map(|new| Category {
                id: RecordId::generate(),
                name: new.name,
            })
            .collect();
        let rows: Vec<NewCategoryRow> = inserted
            .iter()
            .map(|category| NewCategoryRow {
                id: category.id.to_string(),
                name: category.name.clone(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(categories::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted)
    }

    async fn insert_areas(&self, areas: Vec<NewNamed>) -> Result<Vec<Area>, SeedStoreError> {
        if areas.is_empty() {
            return Ok(Vec::new());
        }
        let inserted: Vec<Area> = areas
            .into_iter()
            .map(|new| Area {
                id: RecordId::generate(),
                name: new.name,
            })
            .collect();
        let rows: Vec<NewAreaRow> = inserted
            .iter()
            .map(|area| NewAreaRow {
                id: area.id.to_string(),
                name: area.name.clone(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(areas::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted)
    }

    async fn insert_ingredients(
        &self,
        ingredients: Vec<NewIngredient>,
    ) -> Result<Vec<Ingredient>, SeedStoreError> {
        if ingredients.is_empty() {
            return Ok(Vec::new());
        }
        let inserted: Vec<Ingredient> = ingredients
            .into_iter()
            .map(|new| Ingredient {
                id: RecordId::generate(),
                name: new.name,
                image: new.image,
                description: new.description,
            })
            .collect();
        let rows: Vec<IngredientRow> = inserted
            .iter()
            .map(|ingredient| IngredientRow {
                id: ingredient.id.to_string(),
                name: ingredient.name.clone(),
                image: ingredient.image.clone(),
                description: ingredient.description.clone(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(ingredients::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted)
    }

    async fn insert_users(&self, users: Vec<NewUser>) -> Result<Vec<User>, SeedStoreError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let (rows, inserted): (Vec<NewUserRow>, Vec<User>) = users
            .into_iter()
            .map(|new| {
                let id = RecordId::generate();
                let row = NewUserRow {
                    id: id.to_string(),
                    name: new.name.clone(),
                    email: new.email.clone(),
                    password_hash: new.password_hash.as_str().to_owned(),
                    avatar: new.avatar.clone(),
                };
                let user = User {
                    id,
                    name: new.name,
                    email: new.email,
                    avatar: new.avatar,
                    followers: Vec::new(),
                    following: Vec::new(),
                };
                (row, user)
            })
            .unzip();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted)
    }

    async fn insert_testimonials(
        &self,
        testimonials: Vec<NewTestimonial>,
    ) -> Result<Vec<Testimonial>, SeedStoreError> {
        if testimonials.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let inserted: Vec<Testimonial> = testimonials
            .into_iter()
            .map(|new| Testimonial {
                id: RecordId::generate(),
                text: new.text,
                name: new.name,
                owner: new.owner,
                created_at: now,
            })
            .collect();
        let rows: Vec<NewTestimonialRow> = inserted
            .iter()
            .map(|testimonial| NewTestimonialRow {
                id: testimonial.id.to_string(),
                text: testimonial.text.clone(),
                name: testimonial.name.clone(),
                owner_id: testimonial.owner.map(|owner| owner.to_string()),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(testimonials::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted)
    }

    async fn insert_recipes(&self, recipes: Vec<NewRecipe>) -> Result<Vec<Recipe>, SeedStoreError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let mut rows = Vec::with_capacity(recipes.len());
        let mut inserted = Vec::with_capacity(recipes.len());
        for new in recipes {
            let id = RecordId::generate();
            rows.push(RecipeRow::from_new(id, &new).map_err(SeedStoreError::query)?);
            inserted.push(Recipe::from_new(id, new));
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(recipes::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted)
    }

    async fn link_follow(
        &self,
        follower: RecordId,
        followee: RecordId,
    ) -> Result<(), SeedStoreError> {
        let (follower, followee) = (follower.to_string(), followee.to_string());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = conn
            .transaction(|conn| {
                async move { append_follow(conn, &follower, &followee).await }.scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        debug!(changed, "linked follow");
        Ok(())
    }
}

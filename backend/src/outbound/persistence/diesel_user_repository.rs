//! PostgreSQL-backed user adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{RecordId, User};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, map_pool_error_message,
};
use super::diesel_seed_store::append_follow;
use super::models::{UserRow, id_strings};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const REMOVE_FOLLOWING_SQL: &str = r"
UPDATE users SET following = array_remove(following, $2)
WHERE id = $1 AND $2 = ANY(following)
";

const REMOVE_FOLLOWER_SQL: &str = r"
UPDATE users SET followers = array_remove(followers, $2)
WHERE id = $1
";

/// Diesel-backed implementation of the [`UserRepository`] port.
///
/// Password hashes are never selected.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify_diesel_error(error, "user repository") {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find(&self, id: RecordId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.to_string())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from)
            .transpose()
            .map_err(UserRepositoryError::query)
    }

    async fn find_many(&self, ids: &[RecordId]) -> Result<Vec<User>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(id_strings(ids)))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, UserRepositoryError::query)
    }

    async fn follow(&self, actor: RecordId, target: RecordId) -> Result<bool, UserRepositoryError> {
        let (actor, target) = (actor.to_string(), target.to_string());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = conn
            .transaction(|conn| {
                async move { append_follow(conn, &actor, &target).await }.scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }

    async fn unfollow(
        &self,
        actor: RecordId,
        target: RecordId,
    ) -> Result<bool, UserRepositoryError> {
        let (actor, target) = (actor.to_string(), target.to_string());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = conn
            .transaction(|conn| {
                async move {
                    let changed = sql_query(REMOVE_FOLLOWING_SQL)
                        .bind::<Text, _>(&actor)
                        .bind::<Text, _>(&target)
                        .execute(conn)
                        .await?;
                    if changed > 0 {
                        sql_query(REMOVE_FOLLOWER_SQL)
                            .bind::<Text, _>(&target)
                            .bind::<Text, _>(&actor)
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, diesel::result::Error>(changed)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }
}

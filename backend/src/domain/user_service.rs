//! User profile read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{RecipeRepository, UserQuery, UserRepository};
use crate::domain::{Error, RecordId, UserProfile};

/// Message returned when a user identifier does not resolve.
pub const USER_NOT_FOUND: &str = "User not found";

/// User service implementing [`UserQuery`].
#[derive(Clone)]
pub struct UserService<U, R> {
    users: Arc<U>,
    recipes: Arc<R>,
}

impl<U, R> UserService<U, R> {
    /// Create a new service over the given repositories.
    pub fn new(users: Arc<U>, recipes: Arc<R>) -> Self {
        Self { users, recipes }
    }
}

#[async_trait]
impl<U, R> UserQuery for UserService<U, R>
where
    U: UserRepository,
    R: RecipeRepository,
{
    async fn profile(&self, id: RecordId) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        let recipes_count = self.recipes.count_by_author(user.id).await?;
        Ok(UserProfile::new(user, recipes_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockRecipeRepository, MockUserRepository};
    use crate::domain::{ErrorCode, User};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn profile_counts_authored_recipes() {
        let user = User {
            id: RecordId::generate(),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            avatar: None,
            followers: vec![RecordId::generate()],
            following: Vec::new(),
        };
        let user_id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find()
            .withf(move |id| *id == user_id)
            .return_once(move |_| Ok(Some(user)));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_count_by_author()
            .withf(move |author| *author == user_id)
            .return_once(|_| Ok(3));

        let profile = UserService::new(Arc::new(users), Arc::new(recipes))
            .profile(user_id)
            .await
            .expect("profile loads");

        assert_eq!(profile.recipes_count, 3);
        assert_eq!(profile.followers_count, 1);
        assert_eq!(profile.following_count, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find().return_once(|_| Ok(None));
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_count_by_author().never();

        let err = UserService::new(Arc::new(users), Arc::new(recipes))
            .profile(RecordId::generate())
            .await
            .expect_err("user missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), USER_NOT_FOUND);
    }
}

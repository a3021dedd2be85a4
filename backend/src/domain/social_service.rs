//! Favourite and follow commands.
//!
//! Each change is a single array update in the store; the checks below run
//! first so callers get a precise error instead of a silent no-op.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{RecipeRepository, UserRepository};
use crate::domain::recipe_service::RECIPE_NOT_FOUND;
use crate::domain::user_service::USER_NOT_FOUND;
use crate::domain::{Error, RecordId};

/// Adds and removes recipes from a user's favourites.
#[derive(Clone)]
pub struct FavoritesService<R> {
    recipes: Arc<R>,
}

impl<R> FavoritesService<R> {
    /// Create a new service over the recipe repository.
    pub fn new(recipes: Arc<R>) -> Self {
        Self { recipes }
    }
}

impl<R: RecipeRepository> FavoritesService<R> {
    /// Add `recipe` to the favourites of `user`.
    ///
    /// # Errors
    ///
    /// Not found when the recipe does not exist; invalid request when the
    /// user already favourited it.
    pub async fn add(&self, user: RecordId, recipe: RecordId) -> Result<(), Error> {
        let found = self
            .recipes
            .find(recipe)
            .await?
            .ok_or_else(|| Error::not_found(RECIPE_NOT_FOUND))?;
        if found.favorited_by.contains(&user) || !self.recipes.add_favorite(recipe, user).await? {
            return Err(Error::invalid_request("Recipe already in favorites"));
        }
        debug!(%recipe, %user, "recipe favourited");
        Ok(())
    }

    /// Remove `recipe` from the favourites of `user`. Removing a recipe that
    /// was not favourited succeeds.
    ///
    /// # Errors
    ///
    /// Not found when the recipe does not exist.
    pub async fn remove(&self, user: RecordId, recipe: RecordId) -> Result<(), Error> {
        if self.recipes.find(recipe).await?.is_none() {
            return Err(Error::not_found(RECIPE_NOT_FOUND));
        }
        let removed = self.recipes.remove_favorite(recipe, user).await?;
        debug!(%recipe, %user, removed, "recipe unfavourited");
        Ok(())
    }
}

/// Follows and unfollows users.
#[derive(Clone)]
pub struct FollowService<U> {
    users: Arc<U>,
}

impl<U> FollowService<U> {
    /// Create a new service over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U: UserRepository> FollowService<U> {
    /// Make `actor` follow `target`.
    ///
    /// # Errors
    ///
    /// Not found when the target does not exist; invalid request when the
    /// actor targets themselves or already follows the target.
    pub async fn follow(&self, actor: RecordId, target: RecordId) -> Result<(), Error> {
        if self.users.find(target).await?.is_none() {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        if actor == target {
            return Err(Error::invalid_request("You cannot follow yourself"));
        }
        if !self.users.follow(actor, target).await? {
            return Err(Error::invalid_request("Already following this user"));
        }
        debug!(%actor, %target, "user followed");
        Ok(())
    }

    /// Make `actor` stop following `target`.
    ///
    /// # Errors
    ///
    /// Not found when the target does not exist; invalid request when the
    /// actor does not follow the target.
    pub async fn unfollow(&self, actor: RecordId, target: RecordId) -> Result<(), Error> {
        if self.users.find(target).await?.is_none() {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        if !self.users.unfollow(actor, target).await? {
            return Err(Error::invalid_request("Not following this user"));
        }
        debug!(%actor, %target, "user unfollowed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockRecipeRepository, MockUserRepository};
    use crate::domain::{ErrorCode, Recipe, User};
    use chrono::Utc;
    use rstest::rstest;

    fn recipe(id: RecordId, favorited_by: Vec<RecordId>) -> Recipe {
        Recipe {
            id,
            title: "Pizza".to_owned(),
            description: "A delicious pizza recipe.".to_owned(),
            instructions: "Bake.".to_owned(),
            image: None,
            cooking_time: None,
            category: RecordId::generate(),
            area: RecordId::generate(),
            ingredients: Vec::new(),
            author: RecordId::generate(),
            favorited_by,
            created_at: Utc::now(),
        }
    }

    fn user(id: RecordId) -> User {
        User {
            id,
            name: "Ben".to_owned(),
            email: "ben@example.com".to_owned(),
            avatar: None,
            followers: Vec::new(),
            following: Vec::new(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn favoriting_adds_once() {
        let (recipe_id, user_id) = (RecordId::generate(), RecordId::generate());
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find()
            .return_once(move |id| Ok(Some(recipe(id, Vec::new()))));
        recipes
            .expect_add_favorite()
            .withf(move |r, u| *r == recipe_id && *u == user_id)
            .times(1)
            .return_once(|_, _| Ok(true));

        FavoritesService::new(Arc::new(recipes))
            .add(user_id, recipe_id)
            .await
            .expect("favourite added");
    }

    #[rstest]
    #[tokio::test]
    async fn favoriting_twice_is_rejected() {
        let user_id = RecordId::generate();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find()
            .return_once(move |id| Ok(Some(recipe(id, vec![user_id]))));
        recipes.expect_add_favorite().never();

        let err = FavoritesService::new(Arc::new(recipes))
            .add(user_id, RecordId::generate())
            .await
            .expect_err("already favourited");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Recipe already in favorites");
    }

    #[rstest]
    #[case::add(true)]
    #[case::remove(false)]
    #[tokio::test]
    async fn favorites_require_an_existing_recipe(#[case] adding: bool) {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_find().return_once(|_| Ok(None));
        let service = FavoritesService::new(Arc::new(recipes));
        let (user, recipe) = (RecordId::generate(), RecordId::generate());

        let result = if adding {
            service.add(user, recipe).await
        } else {
            service.remove(user, recipe).await
        };
        let err = result.expect_err("recipe missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), RECIPE_NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn following_yourself_is_rejected() {
        let me = RecordId::generate();
        let mut users = MockUserRepository::new();
        users
            .expect_find()
            .return_once(move |id| Ok(Some(user(id))));
        users.expect_follow().never();

        let err = FollowService::new(Arc::new(users))
            .follow(me, me)
            .await
            .expect_err("self follow");
        assert_eq!(err.message(), "You cannot follow yourself");
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some("Already following this user"))]
    #[tokio::test]
    async fn follow_reports_existing_edges(
        #[case] created: bool,
        #[case] expected_error: Option<&'static str>,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find()
            .return_once(move |id| Ok(Some(user(id))));
        users.expect_follow().return_once(move |_, _| Ok(created));

        let result = FollowService::new(Arc::new(users))
            .follow(RecordId::generate(), RecordId::generate())
            .await;
        assert_eq!(result.err().map(|err| err.message().to_owned()).as_deref(), expected_error);
    }

    #[rstest]
    #[tokio::test]
    async fn unfollow_requires_an_existing_edge() {
        let mut users = MockUserRepository::new();
        users
            .expect_find()
            .return_once(move |id| Ok(Some(user(id))));
        users.expect_unfollow().return_once(|_, _| Ok(false));

        let err = FollowService::new(Arc::new(users))
            .unfollow(RecordId::generate(), RecordId::generate())
            .await
            .expect_err("not following");
        assert_eq!(err.message(), "Not following this user");
    }

    #[rstest]
    #[tokio::test]
    async fn follow_targets_must_exist() {
        let mut users = MockUserRepository::new();
        users.expect_find().return_once(|_| Ok(None));

        let err = FollowService::new(Arc::new(users))
            .unfollow(RecordId::generate(), RecordId::generate())
            .await
            .expect_err("target missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), USER_NOT_FOUND);
    }
}

//! In-process store implementing every persistence port.
//!
//! Used by the server when no database URL is configured and by tests that
//! exercise the importer and the read API end to end. Ordering and filtering
//! mirror the PostgreSQL adapters.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, RecipeRepository, RecipeRepositoryError,
    SeedStore, SeedStoreError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Area, Category, Ingredient, NewIngredient, NewNamed, NewRecipe, NewTestimonial, NewUser,
    PasswordHash, Recipe, RecipeFilter, RecordId, Testimonial, User,
};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    areas: Vec<Area>,
    ingredients: Vec<Ingredient>,
    users: Vec<(User, PasswordHash)>,
    recipes: Vec<Recipe>,
    testimonials: Vec<Testimonial>,
}

impl State {
    fn user_mut(&mut self, id: RecordId) -> Option<&mut User> {
        self.users
            .iter_mut()
            .map(|(user, _)| user)
            .find(|user| user.id == id)
    }

    fn recipe_mut(&mut self, id: RecordId) -> Option<&mut Recipe> {
        self.recipes.iter_mut().find(|recipe| recipe.id == id)
    }

    /// Add the follow edge to both users. Returns whether the follower's
    /// list changed.
    fn link(&mut self, follower: RecordId, followee: RecordId) -> bool {
        let changed = self
            .user_mut(follower)
            .is_some_and(|user| push_unique(&mut user.following, followee));
        if let Some(user) = self.user_mut(followee) {
            push_unique(&mut user.followers, follower);
        }
        changed
    }
}

fn push_unique(ids: &mut Vec<RecordId>, id: RecordId) -> bool {
    if ids.contains(&id) {
        return false;
    }
    ids.push(id);
    true
}

fn remove_id(ids: &mut Vec<RecordId>, id: RecordId) -> bool {
    let before = ids.len();
    ids.retain(|existing| *existing != id);
    ids.len() != before
}

fn by_name<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<T>
where
    T: Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| name(a).cmp(name(b)));
    sorted
}

fn newest_first(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    /// Stored password hash of user `id`, if the user exists.
    pub fn password_hash(&self, id: RecordId) -> Option<PasswordHash> {
        let state = self.lock().ok()?;
        state
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(_, hash)| hash.clone())
    }
}

#[async_trait]
impl SeedStore for InMemoryStore {
    async fn clear_all(&self) -> Result<(), SeedStoreError> {
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        *state = State::default();
        Ok(())
    }

    async fn insert_categories(
        &self,
        categories: Vec<NewNamed>,
    ) -> Result<Vec<Category>, SeedStoreError> {
        let inserted: Vec<Category> = categories
            .into_iter()
            .map(|new| Category {
                id: RecordId::generate(),
                name: new.name,
            })
            .collect();
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        state.categories.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_areas(&self, areas: Vec<NewNamed>) -> Result<Vec<Area>, SeedStoreError> {
        let inserted: Vec<Area> = areas
            .into_iter()
            .map(|new| Area {
                id: RecordId::generate(),
                name: new.name,
            })
            .collect();
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        state.areas.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_ingredients(
        &self,
        ingredients: Vec<NewIngredient>,
    ) -> Result<Vec<Ingredient>, SeedStoreError> {
        let inserted: Vec<Ingredient> = ingredients
            .into_iter()
            .map(|new| Ingredient {
                id: RecordId::generate(),
                name: new.name,
                image: new.image,
                description: new.description,
            })
            .collect();
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        state.ingredients.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_users(&self, users: Vec<NewUser>) -> Result<Vec<User>, SeedStoreError> {
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        let mut inserted = Vec::with_capacity(users.len());
        for new in users {
            let user = User {
                id: RecordId::generate(),
                name: new.name,
                email: new.email,
                avatar: new.avatar,
                followers: Vec::new(),
                following: Vec::new(),
            };
            state.users.push((user.clone(), new.password_hash));
            inserted.push(user);
        }
        Ok(inserted)
    }

    async fn insert_testimonials(
        &self,
        testimonials: Vec<NewTestimonial>,
    ) -> Result<Vec<Testimonial>, SeedStoreError> {
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
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        state.testimonials.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_recipes(&self, recipes: Vec<NewRecipe>) -> Result<Vec<Recipe>, SeedStoreError> {
        let inserted: Vec<Recipe> = recipes
            .into_iter()
            .map(|new| Recipe::from_new(RecordId::generate(), new))
            .collect();
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        state.recipes.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn link_follow(
        &self,
        follower: RecordId,
        followee: RecordId,
    ) -> Result<(), SeedStoreError> {
        let mut state = self.lock().map_err(SeedStoreError::connection)?;
        state.link(follower, followee);
        Ok(())
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::connection)?;
        Ok(by_name(&state.categories, |category| &category.name))
    }

    async fn list_areas(&self) -> Result<Vec<Area>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::connection)?;
        Ok(by_name(&state.areas, |area| &area.name))
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::connection)?;
        Ok(by_name(&state.ingredients, |ingredient| &ingredient.name))
    }

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::connection)?;
        let mut testimonials = state.testimonials.clone();
        testimonials.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(testimonials)
    }

    async fn categories_by_ids(
        &self,
        ids: &[RecordId],
    ) -> Result<Vec<Category>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::connection)?;
        Ok(state
            .categories
            .iter()
            .filter(|category| ids.contains(&category.id))
            .cloned()
            .collect())
    }

    async fn areas_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Area>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::connection)?;
        Ok(state
            .areas
            .iter()
            .filter(|area| ids.contains(&area.id))
            .cloned()
            .collect())
    }

    async fn ingredients_by_ids(
        &self,
        ids: &[RecordId],
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::connection)?;
        Ok(state
            .ingredients
            .iter()
            .filter(|ingredient| ids.contains(&ingredient.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let mut matching: Vec<Recipe> = state
            .recipes
            .iter()
            .filter(|recipe| recipe.matches(filter))
            .cloned()
            .collect();
        newest_first(&mut matching);
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(offset).take(limit).collect();
        Ok((items, total))
    }

    async fn popular(&self, limit: u32) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let mut recipes = state.recipes.clone();
        newest_first(&mut recipes);
        recipes.sort_by_key(|recipe| std::cmp::Reverse(recipe.popularity()));
        recipes.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(recipes)
    }

    async fn find(&self, id: RecordId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::connection)?;
        Ok(state.recipes.iter().find(|recipe| recipe.id == id).cloned())
    }

    async fn count_by_author(&self, author: RecordId) -> Result<u64, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let count = state
            .recipes
            .iter()
            .filter(|recipe| recipe.author == author)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let created = Recipe::from_new(RecordId::generate(), recipe);
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        state.recipes.push(created.clone());
        Ok(created)
    }

    async fn update(&self, recipe: &Recipe) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let Some(stored) = state.recipe_mut(recipe.id) else {
            return Ok(false);
        };
        *stored = Recipe {
            author: stored.author,
            favorited_by: std::mem::take(&mut stored.favorited_by),
            created_at: stored.created_at,
            ..recipe.clone()
        };
        Ok(true)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let before = state.recipes.len();
        state.recipes.retain(|recipe| recipe.id != id);
        Ok(state.recipes.len() != before)
    }

    async fn add_favorite(
        &self,
        recipe: RecordId,
        user: RecordId,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        Ok(state
            .recipe_mut(recipe)
            .is_some_and(|recipe| push_unique(&mut recipe.favorited_by, user)))
    }

    async fn remove_favorite(
        &self,
        recipe: RecordId,
        user: RecordId,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        Ok(state
            .recipe_mut(recipe)
            .is_some_and(|recipe| remove_id(&mut recipe.favorited_by, user)))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find(&self, id: RecordId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(state
            .users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id == id)
            .cloned())
    }

    async fn find_many(&self, ids: &[RecordId]) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(state
            .users
            .iter()
            .map(|(user, _)| user)
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn follow(&self, actor: RecordId, target: RecordId) -> Result<bool, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(state.link(actor, target))
    }

    async fn unfollow(
        &self,
        actor: RecordId,
        target: RecordId,
    ) -> Result<bool, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::connection)?;
        let changed = state
            .user_mut(actor)
            .is_some_and(|user| remove_id(&mut user.following, target));
        if changed {
            if let Some(user) = state.user_mut(target) {
                remove_id(&mut user.followers, actor);
            }
        }
        Ok(changed)
    }
}

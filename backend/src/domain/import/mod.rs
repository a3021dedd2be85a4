//! Fixture import: rebuilds the store from JSON fixture sets.
//!
//! A run loads every fixture set, clears the store, then inserts categories,
//! areas, ingredients, users and testimonials before recipes, so recipe
//! category and area names can be resolved against the records just written.
//! Recipes whose references do not resolve are skipped and counted rather
//! than failing the run. Store and hashing failures abort the run.

mod batch;
mod credentials;
mod report;
mod resolver;


use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use seed_fixtures::{
    AreaRecord, CategoryRecord, FixtureRecord, FixtureSet, FixtureSource, IngredientRecord,
    RecipeRecord, TestimonialRecord, UserRecord,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

pub use batch::{BatchOutcome, insert_batched};
pub use credentials::{CredentialProcessor, DEFAULT_PASSWORD};
pub use report::{EntityCount, ImportReport, SkipReason, SkippedRecipe};
pub use resolver::{MAX_FAVORITES_PER_RECIPE, ReferenceResolver, pick_author, pick_favorites};

use crate::domain::ports::{PasswordHasher, PasswordHasherError, SeedStore, SeedStoreError};
use crate::domain::{
    NewIngredient, NewNamed, NewRecipe, NewTestimonial, RecordId, TESTIMONIAL_TEXT_MAX, User,
};

/// Name given to testimonials imported while no users exist.
pub const ANONYMOUS_TESTIMONIAL_NAME: &str = "Anonymous User";
/// Default probability that a recipe receives favourites.
pub const DEFAULT_FAVORITE_PROBABILITY: f64 = 0.3;
/// Default ingredient batch size.
pub const DEFAULT_INGREDIENT_BATCH_SIZE: NonZeroUsize = non_zero(500);
/// Default recipe batch size.
pub const DEFAULT_RECIPE_BATCH_SIZE: NonZeroUsize = non_zero(100);
/// Default batch size for the remaining, small, entity sets.
pub const DEFAULT_ENTITY_BATCH_SIZE: NonZeroUsize = non_zero(1000);

/// Follow edges written between the first inserted users, by index.
const DEMO_FOLLOWS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 3)];
/// Demo follows are only written when at least this many users exist.
const DEMO_FOLLOW_MIN_USERS: usize = 4;

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(size) => size,
        None => NonZeroUsize::MIN,
    }
}

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The store rejected a clear or write.
    #[error("seed store error: {0}")]
    Store(#[from] SeedStoreError),
    /// A password could not be hashed.
    #[error("credential processing failed: {0}")]
    Hashing(#[from] PasswordHasherError),
}

/// Tunables for an import run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    ingredient_batch_size: NonZeroUsize,
    recipe_batch_size: NonZeroUsize,
    entity_batch_size: NonZeroUsize,
    default_password: String,
    favorite_probability: f64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            ingredient_batch_size: DEFAULT_INGREDIENT_BATCH_SIZE,
            recipe_batch_size: DEFAULT_RECIPE_BATCH_SIZE,
            entity_batch_size: DEFAULT_ENTITY_BATCH_SIZE,
            default_password: DEFAULT_PASSWORD.to_owned(),
            favorite_probability: DEFAULT_FAVORITE_PROBABILITY,
        }
    }
}

impl ImportOptions {
    /// Override the ingredient batch size; zero is raised to one.
    #[must_use]
    pub fn with_ingredient_batch_size(mut self, size: usize) -> Self {
        self.ingredient_batch_size = non_zero(size);
        self
    }

    /// Override the recipe batch size; zero is raised to one.
    #[must_use]
    pub fn with_recipe_batch_size(mut self, size: usize) -> Self {
        self.recipe_batch_size = non_zero(size);
        self
    }

    /// Override the batch size used for categories, areas, users and
    /// testimonials; zero is raised to one.
    #[must_use]
    pub fn with_entity_batch_size(mut self, size: usize) -> Self {
        self.entity_batch_size = non_zero(size);
        self
    }

    /// Override the password given to users without one.
    #[must_use]
    pub fn with_default_password(mut self, password: impl Into<String>) -> Self {
        self.default_password = password.into();
        self
    }

    /// Override the favourite probability, clamped to `0.0..=1.0`. NaN keeps
    /// the default.
    #[must_use]
    pub fn with_favorite_probability(mut self, probability: f64) -> Self {
        self.favorite_probability = if probability.is_nan() {
            DEFAULT_FAVORITE_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    /// Ingredient batch size.
    pub fn ingredient_batch_size(&self) -> NonZeroUsize {
        self.ingredient_batch_size
    }

    /// Recipe batch size.
    pub fn recipe_batch_size(&self) -> NonZeroUsize {
        self.recipe_batch_size
    }

    /// Batch size for the remaining entity sets.
    pub fn entity_batch_size(&self) -> NonZeroUsize {
        self.entity_batch_size
    }

    /// Password given to users without one.
    pub fn default_password(&self) -> &str {
        &self.default_password
    }

    /// Probability that a recipe receives favourites.
    pub fn favorite_probability(&self) -> f64 {
        self.favorite_probability
    }
}

/// Service that replaces the store contents with a fixture set.
pub struct FixtureImporter<S: ?Sized, H: ?Sized> {
    store: Arc<S>,
    hasher: Arc<H>,
    options: ImportOptions,
}

impl<S: ?Sized, H: ?Sized> FixtureImporter<S, H> {
    /// Create an importer writing to `store` and hashing with `hasher`.
    pub fn new(store: Arc<S>, hasher: Arc<H>, options: ImportOptions) -> Self {
        Self {
            store,
            hasher,
            options,
        }
    }

    /// Options the importer was built with.
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }
}

impl<S, H> FixtureImporter<S, H>
where
    S: SeedStore + ?Sized,
    H: PasswordHasher + ?Sized,
{
    /// Clear the store and import every fixture set from `source`.
    ///
    /// Random author and favourite choices are drawn from `rng`; the same
    /// seed over the same fixtures makes the same choices.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the store rejects a write or a password
    /// cannot be hashed. Writes made before the failure are kept.
    pub async fn run<F, R>(&self, source: &F, rng: &mut R) -> Result<ImportReport, ImportError>
    where
        F: FixtureSource + ?Sized,
        R: Rng + ?Sized,
    {
        let mut report = ImportReport::default();

        let categories: Vec<CategoryRecord> = decode_set(source, &mut report.categories);
        let areas: Vec<AreaRecord> = decode_set(source, &mut report.areas);
        let ingredients: Vec<IngredientRecord> = decode_set(source, &mut report.ingredients);
        let users: Vec<UserRecord> = decode_set(source, &mut report.users);
        let testimonials: Vec<TestimonialRecord> = decode_set(source, &mut report.testimonials);
        let recipes = source.load(FixtureSet::Recipes);

        info!("clearing existing records");
        self.store.clear_all().await?;

        let categories = insert_batched(
            "categories",
            categories.into_iter().map(|record| NewNamed::new(record.name)).collect(),
            self.options.entity_batch_size,
            |chunk| self.store.insert_categories(chunk),
        )
        .await?
        .inserted;
        report.categories.inserted = categories.len();
        info!(count = categories.len(), "inserted categories");

        let areas = insert_batched(
            "areas",
            areas.into_iter().map(|record| NewNamed::new(record.name)).collect(),
            self.options.entity_batch_size,
            |chunk| self.store.insert_areas(chunk),
        )
        .await?
        .inserted;
        report.areas.inserted = areas.len();
        info!(count = areas.len(), "inserted areas");

        let ingredients = insert_batched(
            "ingredients",
            ingredients.into_iter().map(new_ingredient).collect(),
            self.options.ingredient_batch_size,
            |chunk| self.store.insert_ingredients(chunk),
        )
        .await?;
        report.ingredients.inserted = ingredients.inserted.len();
        report.ingredient_batches = ingredients.batches;
        info!(
            count = ingredients.inserted.len(),
            batches = ingredients.batches,
            "inserted ingredients"
        );

        let users = self.import_users(users).await?;
        report.users.inserted = users.len();
        info!(count = users.len(), "inserted users");

        self.import_testimonials(testimonials, &users, &mut report)
            .await?;
        info!(count = report.testimonials.inserted, "inserted testimonials");

        let resolver = ReferenceResolver::from_inserted(&categories, &areas);
        let user_ids: Vec<RecordId> = users.iter().map(|user| user.id).collect();
        let mut pending = Vec::with_capacity(recipes.len());
        for raw in recipes {
            let title = raw
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            match self.prepare_recipe(raw, &resolver, &user_ids, rng, &mut report) {
                Ok(recipe) => pending.push(recipe),
                Err(reason) => {
                    warn!(%title, %reason, "skipping recipe");
                    report.skip_recipe(title, reason);
                }
            }
        }

        let recipes = insert_batched(
            "recipes",
            pending,
            self.options.recipe_batch_size,
            |chunk| self.store.insert_recipes(chunk),
        )
        .await?;
        report.recipes.inserted = recipes.inserted.len();
        report.recipe_batches = recipes.batches;
        info!(
            count = recipes.inserted.len(),
            batches = recipes.batches,
            skipped = report.recipes.skipped,
            "inserted recipes"
        );

        report.follow_links = self.link_demo_follows(&user_ids).await?;

        info!(
            categories = %report.categories,
            areas = %report.areas,
            ingredients = %report.ingredients,
            users = %report.users,
            testimonials = %report.testimonials,
            recipes = %report.recipes,
            dropped_ingredients = report.dropped_ingredients,
            follow_links = report.follow_links,
            "fixture import finished"
        );
        Ok(report)
    }

    async fn import_users(&self, records: Vec<UserRecord>) -> Result<Vec<User>, ImportError> {
        let processor = CredentialProcessor::new(&*self.hasher, &self.options.default_password);
        let users = records
            .into_iter()
            .map(|record| processor.process(record))
            .collect::<Result<Vec<_>, _>>()?;
        let outcome = insert_batched(
            "users",
            users,
            self.options.entity_batch_size,
            |chunk| self.store.insert_users(chunk),
        )
        .await?;
        Ok(outcome.inserted)
    }

    async fn import_testimonials(
        &self,
        records: Vec<TestimonialRecord>,
        users: &[User],
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        let mut pending = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            if record.text.chars().count() > TESTIMONIAL_TEXT_MAX {
                warn!(
                    limit = TESTIMONIAL_TEXT_MAX,
                    "skipping testimonial longer than the limit"
                );
                report.testimonials.skipped += 1;
                continue;
            }
            let owner = match users.len() {
                0 => None,
                len => users.get(index % len),
            };
            pending.push(NewTestimonial {
                text: record.text,
                name: owner.map_or_else(
                    || ANONYMOUS_TESTIMONIAL_NAME.to_owned(),
                    |user| user.name.clone(),
                ),
                owner: owner.map(|user| user.id),
            });
        }
        let outcome = insert_batched(
            "testimonials",
            pending,
            self.options.entity_batch_size,
            |chunk| self.store.insert_testimonials(chunk),
        )
        .await?;
        report.testimonials.inserted = outcome.inserted.len();
        Ok(())
    }

    fn prepare_recipe<R: Rng + ?Sized>(
        &self,
        raw: Value,
        resolver: &ReferenceResolver,
        users: &[RecordId],
        rng: &mut R,
        report: &mut ImportReport,
    ) -> Result<NewRecipe, SkipReason> {
        let record =
            RecipeRecord::decode(raw).map_err(|err| SkipReason::Malformed(err.to_string()))?;
        report.dropped_ingredients += record.dropped_ingredients;
        let (category, area) = resolver.resolve(&record)?;
        let cooking_time = record
            .cooking_time
            .map(i32::try_from)
            .transpose()
            .map_err(|_| SkipReason::Malformed("cooking time out of range".to_owned()))?;
        let author = pick_author(users, rng).ok_or(SkipReason::NoAuthor)?;
        let favorited_by = pick_favorites(users, self.options.favorite_probability, rng);

        let recipe = NewRecipe {
            title: record.title,
            description: record.description,
            instructions: record.instructions,
            image: record.image,
            cooking_time,
            category,
            area,
            ingredients: record.ingredients.into_iter().map(Into::into).collect(),
            author,
            favorited_by,
            created_at: record.created_at.unwrap_or_else(Utc::now),
        };
        recipe
            .validate()
            .map_err(|err| SkipReason::Malformed(err.to_string()))?;
        Ok(recipe)
    }

    async fn link_demo_follows(&self, users: &[RecordId]) -> Result<usize, ImportError> {
        if users.len() < DEMO_FOLLOW_MIN_USERS {
            return Ok(0);
        }
        let mut linked = 0;
        for (follower, followee) in DEMO_FOLLOWS {
            if let (Some(follower), Some(followee)) = (users.get(follower), users.get(followee)) {
                self.store.link_follow(*follower, *followee).await?;
                linked += 1;
            }
        }
        info!(count = linked, "linked demo follows");
        Ok(linked)
    }
}

fn decode_set<T, F>(source: &F, count: &mut EntityCount) -> Vec<T>
where
    T: FixtureRecord,
    F: FixtureSource + ?Sized,
{
    let raw = source.load(T::SET);
    let mut records = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match T::decode(value) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(set = %T::SET, index, error = %err, "skipping malformed fixture record");
                count.skipped += 1;
            }
        }
    }
    records
}

fn new_ingredient(record: IngredientRecord) -> NewIngredient {
    NewIngredient {
        name: record.name,
        image: record.image,
        description: record.description,
    }
}

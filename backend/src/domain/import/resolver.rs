//! Reference resolution for recipe fixtures.
//!
//! Recipe fixtures name their category and area ("Dessert", "Italian").
//! Those names are matched case-insensitively against the records inserted
//! earlier in the same run. Authors and favourites are drawn from the inserted
//! users through an injected random source so runs can be reproduced.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use seed_fixtures::{RecipeRecord, Reference};

use crate::domain::{Area, Category, RecordId};

use super::report::SkipReason;

/// Upper bound on favouriting users drawn for one recipe.
pub const MAX_FAVORITES_PER_RECIPE: usize = 3;

/// Case-insensitive lookup from category and area names to inserted ids.
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver {
    categories: HashMap<String, RecordId>,
    areas: HashMap<String, RecordId>,
}

fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ReferenceResolver {
    /// Build the lookup from inserted records. On duplicate names the later
    /// record wins.
    pub fn from_inserted(categories: &[Category], areas: &[Area]) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|category| (lookup_key(&category.name), category.id))
                .collect(),
            areas: areas
                .iter()
                .map(|area| (lookup_key(&area.name), area.id))
                .collect(),
        }
    }

    /// Resolve the category and area of `record`, category first.
    ///
    /// Identifier references pass through unchanged.
    pub fn resolve(&self, record: &RecipeRecord) -> Result<(RecordId, RecordId), SkipReason> {
        let category = resolve_reference(&self.categories, &record.category)
            .ok_or_else(|| SkipReason::UnknownCategory(reference_text(&record.category)))?;
        let area = resolve_reference(&self.areas, &record.area)
            .ok_or_else(|| SkipReason::UnknownArea(reference_text(&record.area)))?;
        Ok((category, area))
    }
}

fn resolve_reference(map: &HashMap<String, RecordId>, reference: &Reference) -> Option<RecordId> {
    match reference {
        Reference::Id(id) => Some((*id).into()),
        Reference::Name(name) => map.get(&lookup_key(name)).copied(),
    }
}

fn reference_text(reference: &Reference) -> String {
    match reference {
        Reference::Id(id) => id.to_hex(),
        Reference::Name(name) => name.clone(),
    }
}

/// Pick a uniformly random author from `users`.
pub fn pick_author<R: Rng + ?Sized>(users: &[RecordId], rng: &mut R) -> Option<RecordId> {
    users.choose(rng).copied()
}

/// With probability `probability`, pick between one and
/// [`MAX_FAVORITES_PER_RECIPE`] distinct users to favourite a recipe.
///
/// `probability` must lie in `0.0..=1.0`.
pub fn pick_favorites<R: Rng + ?Sized>(
    users: &[RecordId],
    probability: f64,
    rng: &mut R,
) -> Vec<RecordId> {
    if users.is_empty() || !rng.random_bool(probability) {
        return Vec::new();
    }
    let wanted = rng.random_range(1..=MAX_FAVORITES_PER_RECIPE);
    users
        .choose_multiple(rng, wanted.min(users.len()))
        .copied()
        .collect()
}

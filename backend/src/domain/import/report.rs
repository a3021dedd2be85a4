//! Summary of a fixture import run.

use std::fmt;

/// Why a recipe fixture was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The category name matched no inserted category.
    UnknownCategory(String),
    /// The area name matched no inserted area.
    UnknownArea(String),
    /// The record could not be decoded or violated a field limit.
    Malformed(String),
    /// No users were inserted, so no author could be assigned.
    NoAuthor,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCategory(name) => write!(f, "unknown category \"{name}\""),
            Self::UnknownArea(name) => write!(f, "unknown area \"{name}\""),
            Self::Malformed(message) => write!(f, "malformed record: {message}"),
            Self::NoAuthor => f.write_str("no users available to author the recipe"),
        }
    }
}

/// A recipe that was dropped during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecipe {
    /// Title from the fixture, or an empty string when absent.
    pub title: String,
    /// Why the recipe was dropped.
    pub reason: SkipReason,
}

/// Inserted and skipped counts for one entity set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCount {
    /// Records written to the store.
    pub inserted: usize,
    /// Records dropped before writing.
    pub skipped: usize,
}

impl fmt::Display for EntityCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} inserted, {} skipped", self.inserted, self.skipped)
    }
}

/// Outcome of [`FixtureImporter::run`](super::FixtureImporter::run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Category counts.
    pub categories: EntityCount,
    /// Area counts.
    pub areas: EntityCount,
    /// Ingredient counts.
    pub ingredients: EntityCount,
    /// User counts.
    pub users: EntityCount,
    /// Testimonial counts.
    pub testimonials: EntityCount,
    /// Recipe counts.
    pub recipes: EntityCount,
    /// Every dropped recipe with its reason.
    pub skipped_recipes: Vec<SkippedRecipe>,
    /// Recipe ingredient entries dropped for having no recognised shape.
    pub dropped_ingredients: usize,
    /// Bulk writes issued for ingredients.
    pub ingredient_batches: usize,
    /// Bulk writes issued for recipes.
    pub recipe_batches: usize,
    /// Demo follow links written.
    pub follow_links: usize,
}

impl ImportReport {
    /// Number of recipes dropped for an unmatched category or area.
    #[must_use]
    pub fn unresolved_references(&self) -> usize {
        self.skipped_recipes
            .iter()
            .filter(|skip| {
                matches!(
                    skip.reason,
                    SkipReason::UnknownCategory(_) | SkipReason::UnknownArea(_)
                )
            })
            .count()
    }

    pub(super) fn skip_recipe(&mut self, title: impl Into<String>, reason: SkipReason) {
        self.recipes.skipped += 1;
        self.skipped_recipes.push(SkippedRecipe {
            title: title.into(),
            reason,
        });
    }
}

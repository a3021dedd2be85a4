//! Seeder configuration loaded via OrthoConfig.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ImportOptions;

/// Directory read when no fixtures directory is configured.
pub const DEFAULT_FIXTURES_DIR: &str = "fixtures";

/// Settings controlling a fixture import.
///
/// Every value is optional; absent values fall back to the importer
/// defaults. Environment variables use the `FOODIES_SEED_` prefix.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODIES_SEED")]
pub struct SeedSettings {
    /// Directory holding `categories.json`, `areas.json` and the other sets.
    pub fixtures_dir: Option<String>,
    /// Seed for author and favourite selection. Drawn at random when absent.
    pub rng_seed: Option<u64>,
    /// Ingredients written per insert.
    pub ingredient_batch_size: Option<usize>,
    /// Recipes written per insert.
    pub recipe_batch_size: Option<usize>,
    /// Password given to fixture users without one.
    pub default_password: Option<String>,
    /// Chance that a recipe receives favourites.
    pub favorite_probability: Option<f64>,
}

impl SeedSettings {
    /// The configured fixtures directory, falling back to
    /// [`DEFAULT_FIXTURES_DIR`].
    pub fn fixtures_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.fixtures_dir
                .as_deref()
                .map(str::trim)
                .filter(|dir| !dir.is_empty())
                .unwrap_or(DEFAULT_FIXTURES_DIR),
        )
    }

    /// Importer options with every configured override applied.
    pub fn import_options(&self) -> ImportOptions {
        let mut options = ImportOptions::default();
        if let Some(size) = self.ingredient_batch_size {
            options = options.with_ingredient_batch_size(size);
        }
        if let Some(size) = self.recipe_batch_size {
            options = options.with_recipe_batch_size(size);
        }
        if let Some(password) = self.default_password.as_deref() {
            options = options.with_default_password(password);
        }
        if let Some(probability) = self.favorite_probability {
            options = options.with_favorite_probability(probability);
        }
        options
    }
}

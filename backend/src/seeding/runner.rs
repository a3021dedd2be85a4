//! Fixture import entry point shared by the binaries.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use seed_fixtures::FixtureDirectory;
use tracing::info;

use super::SeedSettings;
use crate::domain::ports::SeedStore;
use crate::domain::{FixtureImporter, ImportError, ImportReport};
use crate::outbound::credentials::BcryptPasswordHasher;

/// Clear `store` and import the fixture directory named by `settings`.
///
/// The seed actually used is logged so a run drawn from entropy can be
/// repeated with `FOODIES_SEED_RNG_SEED`.
///
/// # Errors
///
/// Returns [`ImportError`] when the store rejects a write or a password
/// cannot be hashed.
pub async fn import_fixtures<S>(
    settings: &SeedSettings,
    store: Arc<S>,
) -> Result<ImportReport, ImportError>
where
    S: SeedStore + ?Sized,
{
    let fixtures_dir = settings.fixtures_dir();
    let seed = settings.rng_seed.unwrap_or_else(rand::random);
    info!(fixtures_dir = %fixtures_dir, rng_seed = seed, "starting fixture import");

    let source = FixtureDirectory::open(&fixtures_dir);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let importer = FixtureImporter::new(
        store,
        Arc::new(BcryptPasswordHasher::new()),
        settings.import_options(),
    );
    importer.run(&source, &mut rng).await
}

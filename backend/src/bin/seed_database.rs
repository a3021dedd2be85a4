//! Destructively reseed the database from a fixture directory.
//!
//! Every run clears categories, areas, ingredients, users, recipes and
//! testimonials before importing. Importer settings come from
//! `FOODIES_SEED_*` variables; the connection string from `--database-url`
//! or `DATABASE_URL`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use backend::domain::ImportReport;
use backend::outbound::persistence::{
    DbPool, DieselSeedStore, PoolConfig, run_pending_migrations_async,
};
use backend::seeding::{SeedSettings, import_fixtures};
use clap::Parser;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `seed-database` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-database",
    about = "Clear the Foodies database and import the fixture files",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = SeedSettings::load_from_iter([OsString::from("seed-database")])
        .map_err(|error| io::Error::other(format!("load seed settings: {error}")))?;
    let database_url = resolve_database_url(args.database_url)?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let outcome = seed(&settings, &database_url, pool.clone()).await;
    pool.close();

    let report = outcome?;
    log_report(&report);
    Ok(())
}

async fn seed(
    settings: &SeedSettings,
    database_url: &str,
    pool: DbPool,
) -> io::Result<ImportReport> {
    let applied = run_pending_migrations_async(database_url.to_owned())
        .await
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    info!(applied, "schema up to date");

    let store = Arc::new(DieselSeedStore::new(pool));
    import_fixtures(settings, store)
        .await
        .map_err(|error| io::Error::other(format!("import fixtures: {error}")))
}

fn log_report(report: &ImportReport) {
    info!(
        categories = %report.categories,
        areas = %report.areas,
        ingredients = %report.ingredients,
        users = %report.users,
        testimonials = %report.testimonials,
        recipes = %report.recipes,
        unresolved_references = report.unresolved_references(),
        skipped_recipes = report.skipped_recipes.len(),
        dropped_ingredients = report.dropped_ingredients,
        "database seeded"
    );
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use env_lock::lock_env;
    use rstest::rstest;

    use super::{CliArgs, resolve_database_url};
    use clap::Parser;

    #[rstest]
    fn resolve_database_url_rejects_empty_explicit() {
        let error = resolve_database_url(Some("   ".to_owned())).expect_err("empty should fail");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn explicit_url_wins_over_environment() {
        let _guard = lock_env([("DATABASE_URL", Some("postgres://env/foodies".to_owned()))]);
        let url = resolve_database_url(Some("postgres://flag/foodies".to_owned())).expect("url");
        assert_eq!(url, "postgres://flag/foodies");
    }

    #[rstest]
    fn environment_is_the_fallback() {
        let _guard = lock_env([("DATABASE_URL", Some("postgres://env/foodies".to_owned()))]);
        assert_eq!(resolve_database_url(None).expect("url"), "postgres://env/foodies");
    }

    #[rstest]
    fn missing_url_is_an_error() {
        let _guard = lock_env([("DATABASE_URL", None::<String>)]);
        let error = resolve_database_url(None).expect_err("missing should fail");
        assert!(error.to_string().contains("DATABASE_URL"));
    }

    #[rstest]
    fn cli_accepts_database_url_flag() {
        let args = CliArgs::try_parse_from(["seed-database", "--database-url", "postgres://x/y"])
            .expect("parse");
        assert_eq!(args.database_url.as_deref(), Some("postgres://x/y"));
    }
}

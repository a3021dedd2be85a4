//! Backend entry-point: serves the read API, health probes and OpenAPI docs.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use actix_web::web;
use backend::inbound::http::health::HealthState;
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations_async};
use backend::seeding::{SeedSettings, import_fixtures};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("load server settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("bind address: {e}")))?;

    let mut config = ServerConfig::new(bind_addr);
    let pool = match settings.database_url() {
        Some(database_url) => {
            run_pending_migrations_async(database_url.clone())
                .await
                .map_err(|e| io::Error::other(format!("run migrations: {e}")))?;
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|e| io::Error::other(format!("open database pool: {e}")))?;
            config = config.with_db_pool(pool.clone());
            Some(pool)
        }
        None => {
            warn!("no database configured; serving from the in-memory store");
            let store = Arc::new(InMemoryStore::new());
            if settings.demo_data() {
                seed_memory_store(store.clone()).await?;
            }
            config = config.with_memory_store(store);
            None
        }
    };

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    let result = create_server(health_state, config)?.await;

    if let Some(pool) = pool {
        pool.close();
    }
    result
}

async fn seed_memory_store(store: Arc<InMemoryStore>) -> io::Result<()> {
    let settings = SeedSettings::load_from_iter([OsString::from("foodies")])
        .map_err(|e| io::Error::other(format!("load seed settings: {e}")))?;
    let report = import_fixtures(&settings, store)
        .await
        .map_err(|e| io::Error::other(format!("import demo data: {e}")))?;
    info!(
        recipes = report.recipes.inserted,
        users = report.users.inserted,
        "demo data loaded"
    );
    Ok(())
}

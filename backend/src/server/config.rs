//! HTTP server settings and configuration object.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Address bound when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Server settings loaded from `FOODIES_*` environment variables, the
/// configuration file and the command line.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODIES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Falls back to `DATABASE_URL`.
    pub database_url: Option<String>,
    /// Import the fixture directory into the in-memory store at start-up.
    /// Ignored when a database is configured.
    pub demo_data: Option<bool>,
}

impl ServerSettings {
    /// The configured bind address, falling back to [`DEFAULT_BIND_ADDR`].
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// The database URL from settings or `DATABASE_URL`; blank values count
    /// as absent.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Whether the in-memory store should be seeded from fixtures.
    pub fn demo_data(&self) -> bool {
        self.demo_data.unwrap_or(false)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) memory_store: Option<Arc<InMemoryStore>>,
}

impl ServerConfig {
    /// Configuration binding `bind_addr` with no store attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            memory_store: None,
        }
    }

    /// Serve from PostgreSQL through the Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Serve from an in-memory store. A database pool takes precedence.
    #[must_use]
    pub fn with_memory_store(mut self, store: Arc<InMemoryStore>) -> Self {
        self.memory_store = Some(store);
        self
    }
}

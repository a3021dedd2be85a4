//! Connection pool shared by the Diesel adapters.
//!
//! [`DbPool::new`] opens the pool and proves the server is reachable;
//! [`DbPool::close`] releases this handle. Adapters hold clones and check out
//! one connection per port call.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::{debug, info};

const DEFAULT_MAX_SIZE: u32 = 10;
const MIN_IDLE: u32 = 2;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool failures; adapters map both onto their `Connection` port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool could not be built or the server did not answer.
    #[error("could not open database pool: {message}")]
    Open { message: String },

    /// No connection became free within the checkout timeout.
    #[error("could not check out a database connection: {message}")]
    Checkout { message: String },
}

impl PoolError {
    fn open(error: impl ToString) -> Self {
        Self::Open {
            message: error.to_string(),
        }
    }

    /// Checkout failure carrying `message`.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }
}

/// Database location and pool width.
///
/// ```
/// use backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/foodies").with_max_size(4);
/// assert_eq!(config.database_url(), "postgres://localhost/foodies");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
}

impl PoolConfig {
    /// Pool of ten connections to `database_url`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Cap the pool at `max_size` connections.
    pub fn with_max_size(self, max_size: u32) -> Self {
        Self { max_size, ..self }
    }

    /// The configured database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Pooled PostgreSQL connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool and check out one connection.
    ///
    /// # Errors
    ///
    /// [`PoolError::Open`] when the pool cannot be built or the server is
    /// unreachable.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(MIN_IDLE.min(config.max_size)))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map_err(PoolError::open)?;
        inner.get().await.map_err(PoolError::open)?;
        info!(max_size = config.max_size, "database pool opened");
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when none is free within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }

    /// Release this handle; connections close once adapter clones are gone.
    pub fn close(self) {
        let state = self.inner.state();
        debug!(
            connections = state.connections,
            idle = state.idle_connections,
            "closing database pool"
        );
        drop(self.inner);
        info!("database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_to_ten_connections() {
        let config = PoolConfig::new("postgres://localhost/foodies");
        assert_eq!(config.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(config.with_max_size(2).max_size, 2);
    }

    #[rstest]
    fn errors_name_the_failing_step() {
        assert_eq!(
            PoolError::open("invalid URL").to_string(),
            "could not open database pool: invalid URL"
        );
        assert!(
            PoolError::checkout("timed out")
                .to_string()
                .starts_with("could not check out")
        );
    }
}

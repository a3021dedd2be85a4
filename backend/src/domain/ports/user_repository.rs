//! Port for user reads and follow-graph updates.

use async_trait::async_trait;

use crate::domain::{RecordId, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// A query or update failed.
        Query { message: String } => "user repository query failed: {message}",
    }
    domain {
        Connection => service_unavailable,
        Query => internal,
    }
}

/// Read and follow-graph access to stored users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// A single user, without credentials.
    async fn find(&self, id: RecordId) -> Result<Option<User>, UserRepositoryError>;

    /// Users with the given ids; unknown ids are absent from the result.
    async fn find_many(&self, ids: &[RecordId]) -> Result<Vec<User>, UserRepositoryError>;

    /// Add `target` to `actor.following` and `actor` to `target.followers`.
    /// Returns `false` when `actor` already followed `target`.
    async fn follow(&self, actor: RecordId, target: RecordId) -> Result<bool, UserRepositoryError>;

    /// Remove the edge added by [`UserRepository::follow`]. Returns `false`
    /// when `actor` did not follow `target`.
    async fn unfollow(
        &self,
        actor: RecordId,
        target: RecordId,
    ) -> Result<bool, UserRepositoryError>;
}

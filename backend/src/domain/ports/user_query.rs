//! Driving port for public user profiles.

use async_trait::async_trait;

use crate::domain::{Error, RecordId, UserProfile};

/// Use-case port behind `GET /api/users/{id}`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// The profile of `id` with recipe and follow counts; `not_found` when
    /// absent.
    async fn profile(&self, id: RecordId) -> Result<UserProfile, Error>;
}

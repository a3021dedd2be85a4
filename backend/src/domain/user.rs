//! User accounts, credentials and profile read models.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordId;

/// A salted one-way password hash. Never holds plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a password hasher.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded hash, as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// User payload before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub avatar: Option<String>,
}

/// Stored user without credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub followers: Vec<RecordId>,
    pub following: Vec<RecordId>,
}

impl User {
    /// Whether this user follows `other`.
    pub fn follows(&self, other: &RecordId) -> bool {
        self.following.contains(other)
    }
}

/// Author or owner fields embedded in recipes and testimonials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            avatar: value.avatar.clone(),
        }
    }
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub recipes_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
}

impl UserProfile {
    /// Build a profile from a user and their authored recipe count.
    pub fn new(user: User, recipes_count: u64) -> Self {
        Self {
            recipes_count,
            followers_count: count(&user.followers),
            following_count: count(&user.following),
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
        }
    }
}

fn count(ids: &[RecordId]) -> u64 {
    u64::try_from(ids.len()).unwrap_or(u64::MAX)
}

//! Credential processing for user fixtures.

use seed_fixtures::UserRecord;

use crate::domain::NewUser;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Password given to fixture users that carry none.
pub const DEFAULT_PASSWORD: &str = "password123";

/// Turns user fixtures into insertable users with hashed passwords.
pub struct CredentialProcessor<'a, H: PasswordHasher + ?Sized> {
    hasher: &'a H,
    default_password: &'a str,
}

impl<'a, H: PasswordHasher + ?Sized> CredentialProcessor<'a, H> {
    /// Create a processor hashing with `hasher`.
    pub fn new(hasher: &'a H, default_password: &'a str) -> Self {
        Self {
            hasher,
            default_password,
        }
    }

    /// Hash the fixture password, or the default when it is absent or empty.
    /// Other fields are copied unchanged.
    pub fn process(&self, record: UserRecord) -> Result<NewUser, PasswordHasherError> {
        let plaintext = record
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .unwrap_or(self.default_password);
        let password_hash = self.hasher.hash(plaintext)?;
        Ok(NewUser {
            name: record.name,
            email: record.email,
            password_hash,
            avatar: record.avatar,
        })
    }
}

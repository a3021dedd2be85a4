//! Port for one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// The hashing primitive rejected its input or failed internally.
        Hashing { message: String } => "password hashing failed: {message}",
    }
    domain {
        Hashing => internal,
    }
}

/// Salted one-way hashing of plaintext passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh salt.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;
}

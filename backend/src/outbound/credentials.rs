//! bcrypt-backed password hashing adapter.

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// bcrypt work factor applied to seeded credentials.
pub const BCRYPT_COST: u32 = 10;

/// [`PasswordHasher`] using bcrypt with a per-call random salt.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher using [`BCRYPT_COST`].
    pub fn new() -> Self {
        Self { cost: BCRYPT_COST }
    }

    /// Hasher with an explicit work factor. bcrypt accepts 4 to 31.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash::from_encoded)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }
}

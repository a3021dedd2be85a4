//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`SeedStore`], [`PasswordHasher`]) are
//! implemented by outbound adapters and return typed port errors. Driving
//! ports (`*Query`) are implemented by domain services and consumed by the
//! HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_query;
mod catalogue_repository;
mod password_hasher;
mod recipe_query;
mod recipe_repository;
mod seed_store;
mod user_query;
mod user_repository;

pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::RecipeQuery;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use seed_store::MockSeedStore;
pub use seed_store::{SeedStore, SeedStoreError};
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

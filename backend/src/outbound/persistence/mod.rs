//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Identifiers as text**: record identifiers are stored as 24-character
//!   hex strings; references between tables carry no foreign keys.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   port error types.
//!
//! # Example
//!
//! ```rust,no_run
//! use backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodies")).await?;
//! let recipes = DieselRecipeRepository::new(pool.clone());
//! # let _ = recipes;
//! pool.close();
//! # Ok(())
//! # }
//! ```

mod diesel_catalogue_repository;
mod diesel_helpers;
mod diesel_recipe_repository;
mod diesel_seed_store;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_seed_store::DieselSeedStore;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_async,
};
pub use pool::{DbPool, PoolConfig, PoolError};

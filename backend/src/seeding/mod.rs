//! Fixture seeding wiring shared by the `seed-database` binary and the
//! in-memory demo server.

mod config;
mod runner;

pub use config::{DEFAULT_FIXTURES_DIR, SeedSettings};
pub use runner::import_fixtures;

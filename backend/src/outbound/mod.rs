//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories and seed store using
//!   Diesel
//! - **memory**: an in-process store implementing the same ports
//! - **credentials**: bcrypt password hashing
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod credentials;
pub mod memory;
pub mod persistence;

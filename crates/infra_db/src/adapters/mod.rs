//! Port adapters
//!
//! Implementations of the application's storage port backed by PostgreSQL.

pub mod lifecycle;

pub use lifecycle::PostgresLifecycleStore;

//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the policy and claims lifecycle, built on SQLx.
//!
//! # Architecture
//!
//! - `repositories`: one repository per table, owning its SQL and row mapping
//! - `adapters`: [`PostgresLifecycleStore`], the `LifecycleStore` port
//!   implementation that composes the repositories
//! - `pool`: connection pool creation and embedded migrations
//!
//! Human-readable numbers are protected by UNIQUE constraints; a violation
//! is reported to the orchestrator as a port conflict so it can retry.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresLifecycleStore};
//!
//! let pool = create_pool(&DatabaseConfig::new("postgres://localhost/lifecycle")).await?;
//! let store = PostgresLifecycleStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresLifecycleStore;
pub use error::DatabaseError;
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};

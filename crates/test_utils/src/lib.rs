//! Test Utilities Crate
//!
//! Shared test infrastructure for the lifecycle workspace.
//!
//! # Modules
//!
//! - `fixtures`: fixed instants, plans, and application and claim payloads
//! - `builders`: builders for applications, policies and claims
//! - `database`: PostgreSQL test containers with the schema applied
//! - `assertions`: assertion helpers for lifecycle results
//! - `generators`: proptest strategies and faked applicant data

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;

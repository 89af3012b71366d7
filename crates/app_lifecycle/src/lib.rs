//! Lifecycle Orchestrator
//!
//! This crate composes the domain crates into the user-facing workflows of
//! the portal and is the only layer that talks to storage:
//!
//! ```text
//! apply -> quote -> pay & issue -> claim -> review -> renew -> report
//! ```
//!
//! Storage is reached through the [`LifecycleStore`] port. `infra_db`
//! provides the PostgreSQL adapter; [`InMemoryStore`] backs tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use app_lifecycle::{Caller, InMemoryStore, LifecycleConfig, LifecycleService};
//!
//! let service = LifecycleService::new(Arc::new(InMemoryStore::new()), LifecycleConfig::default())?;
//! let application = service.submit_application(&Caller::customer(user_id), details).await?;
//! ```

pub mod caller;
pub mod clock;
pub mod config;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod ports;

pub use caller::{Caller, Role};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::LifecycleConfig;
pub use error::{ConflictCode, LifecycleError};
pub use memory::InMemoryStore;
pub use orchestrator::{FileClaimRequest, Issuance, LifecycleService, RenewalPayment, ReportRequest};
pub use ports::{ClaimQuery, LifecycleStore, PolicyQuery};

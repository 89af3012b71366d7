//! Repository implementations for lifecycle records
//!
//! Each repository owns the SQL for one table and maps between its row type
//! and the domain type. Status and kind columns are stored as the domain's
//! snake_case strings; kind-specific details are stored as JSONB.
//!
//! Writes that must land together (issuing a policy, recording a renewal
//! payment) run inside a single transaction in [`PolicyRepository`].

pub mod applications;
pub mod claims;
pub mod plans;
pub mod policies;
pub mod reports;

pub use applications::ApplicationRepository;
pub use claims::ClaimsRepository;
pub use plans::PlanRepository;
pub use policies::PolicyRepository;
pub use reports::ReportRepository;

use core_kernel::Page;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::DatabaseError;

/// Parses a text column into a domain enum
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DatabaseError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e| DatabaseError::undecodable(column, e))
}

/// LIMIT/OFFSET bind values; an absent page binds NULL, which Postgres reads as no limit
pub(crate) fn page_bounds(page: Option<Page>) -> (Option<i64>, i64) {
    match page {
        Some(page) => (Some(i64::from(page.limit)), i64::from(page.offset)),
        None => (None, 0),
    }
}

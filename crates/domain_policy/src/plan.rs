//! Health plan catalog
//!
//! Plans are seeded out of band and are read-only to the lifecycle engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::PlanId;

/// A health plan offered to applicants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    /// Maximum annual cover
    pub coverage_amount: Decimal,
    /// Monthly premium before any adjustment
    pub monthly_premium_base: Decimal,
    pub deductible: Decimal,
    pub copay: Decimal,
    pub features: Vec<String>,
    /// Inactive plans stay readable for existing policies but cannot be selected
    pub active: bool,
}

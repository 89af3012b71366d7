//! Claim reports
//!
//! A report summarises the caller's claims whose relevant date (incident or
//! treatment date) falls within an inclusive date range. Reports are
//! snapshots: once generated they are stored as-is and never updated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::money::percentage_of;
use core_kernel::{DateRange, ReportId, UserId};
use domain_policy::InsuranceKind;

use crate::claim::{Claim, ClaimStatus};

/// Totals over a set of claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_claims: u64,
    pub total_claimed_amount: Decimal,
    /// Sum of approved amounts over approved and paid claims
    pub total_approved_amount: Decimal,
    /// Approved over claimed, as a percentage; `None` renders as N/A
    pub approval_rate: Option<Decimal>,
    pub approved_claims: u64,
    pub rejected_claims: u64,
    pub pending_claims: u64,
}

impl ReportSummary {
    pub fn empty() -> Self {
        Self::from_claims(&[])
    }

    /// Summarises every claim given, without filtering
    pub fn from_claims(claims: &[Claim]) -> Self {
        let mut summary = Self {
            total_claims: 0,
            total_claimed_amount: Decimal::ZERO,
            total_approved_amount: Decimal::ZERO,
            approval_rate: None,
            approved_claims: 0,
            rejected_claims: 0,
            pending_claims: 0,
        };

        for claim in claims {
            summary.total_claims += 1;
            summary.total_claimed_amount += claim.claim_amount;
            if claim.status.is_approved() {
                summary.approved_claims += 1;
                summary.total_approved_amount += claim.approved_amount.unwrap_or(Decimal::ZERO);
            } else if claim.status == ClaimStatus::Rejected {
                summary.rejected_claims += 1;
            } else if claim.status.is_open() {
                summary.pending_claims += 1;
            }
        }

        summary.approval_rate = percentage_of(summary.total_approved_amount, summary.total_claimed_amount);
        summary
    }

    /// Approval rate formatted for display, `"N/A"` when undefined
    pub fn approval_rate_display(&self) -> String {
        match self.approval_rate {
            Some(rate) => format!("{rate}%"),
            None => "N/A".to_string(),
        }
    }
}

/// Claims whose relevant date lies within `range`, in input order
pub fn claims_in_range<'a, I>(claims: I, range: &DateRange) -> Vec<Claim>
where
    I: IntoIterator<Item = &'a Claim>,
{
    claims
        .into_iter()
        .filter(|claim| range.contains(claim.relevant_date()))
        .cloned()
        .collect()
}

/// Summarises the claims that fall within `range`
pub fn aggregate(claims: &[Claim], range: &DateRange) -> ReportSummary {
    ReportSummary::from_claims(&claims_in_range(claims, range))
}

/// A persisted report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub user_id: UserId,
    /// Restricts the report to one claim family when set
    pub family: Option<InsuranceKind>,
    pub range: DateRange,
    pub summary: ReportSummary,
    /// The claims the summary was computed from, as they were at generation
    pub claims: Vec<Claim>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Builds a report from the caller's claims
    ///
    /// Claims belonging to other users are dropped before filtering, so a
    /// report is always scoped to its owner.
    pub fn generate(
        user_id: UserId,
        family: Option<InsuranceKind>,
        range: DateRange,
        claims: &[Claim],
        now: DateTime<Utc>,
    ) -> Self {
        let scoped: Vec<&Claim> = claims
            .iter()
            .filter(|claim| claim.is_owned_by(user_id))
            .filter(|claim| family.map_or(true, |f| claim.family() == f))
            .collect();
        let snapshot = claims_in_range(scoped, &range);
        let summary = ReportSummary::from_claims(&snapshot);

        Self {
            id: ReportId::new_v7(),
            user_id,
            family,
            range,
            summary,
            claims: snapshot,
            generated_at: now,
        }
    }
}

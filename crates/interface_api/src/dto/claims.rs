//! Claims DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use app_lifecycle::{ClaimQuery, FileClaimRequest};
use core_kernel::{Page, PolicyId};
use domain_claims::{ClaimDetails, ClaimReview, ClaimStatus};
use domain_policy::InsuranceKind;

/// A new claim; the amount is checked by the service so that a zero or
/// negative value reports the `claim_amount` field
#[derive(Debug, Deserialize)]
pub struct FileClaimBody {
    pub policy_id: PolicyId,
    pub details: ClaimDetails,
    pub claim_amount: Decimal,
}

impl From<FileClaimBody> for FileClaimRequest {
    fn from(body: FileClaimBody) -> Self {
        FileClaimRequest {
            policy_id: body.policy_id,
            details: body.details,
            claim_amount: body.claim_amount,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ClaimListQuery {
    pub status: Option<ClaimStatus>,
    pub family: Option<InsuranceKind>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ClaimListQuery {
    pub fn to_query(&self) -> ClaimQuery {
        ClaimQuery {
            user_id: None,
            status: self.status,
            family: self.family,
            page: Some(Page::new(self.limit, self.offset)),
        }
    }
}

/// An administrator's review; `status` stays a string so unknown values
/// are reported by the workflow as `invalid_status`
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewClaimRequest {
    pub status: String,
    pub approved_amount: Option<Decimal>,
    #[validate(length(max = 2000))]
    pub rejection_reason: Option<String>,
    #[validate(length(max = 4000))]
    pub admin_notes: Option<String>,
}

impl From<ReviewClaimRequest> for ClaimReview {
    fn from(request: ReviewClaimRequest) -> Self {
        ClaimReview {
            status: request.status,
            approved_amount: request.approved_amount,
            rejection_reason: request.rejection_reason,
            admin_notes: request.admin_notes,
            reviewed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_request_keeps_unknown_status() {
        let request: ReviewClaimRequest = serde_json::from_str(r#"{"status": "archived"}"#).unwrap();
        let review: ClaimReview = request.into();
        assert_eq!(review.status, "archived");
        assert!(review.approved_amount.is_none());
    }

    #[test]
    fn test_list_query_defaults_to_first_page() {
        let query = ClaimListQuery::default().to_query();
        assert_eq!(query.page, Some(Page::new(None, None)));
        assert!(query.user_id.is_none());
    }
}

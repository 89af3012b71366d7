//! Policy DTOs

use serde::Deserialize;
use validator::Validate;

use core_kernel::Page;
use domain_policy::PolicyStatus;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PolicyListQuery {
    pub status: Option<PolicyStatus>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PolicyListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// `?days=` look-ahead for expiry alerts; the configured horizon when absent
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ExpiringQuery {
    #[validate(range(min = 1, max = 366))]
    pub days: Option<u32>,
}

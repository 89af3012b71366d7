//! Request and query DTOs
//!
//! Response bodies are the domain records themselves; only inbound shapes
//! that need checking before they reach the service live here.

pub mod applications;
pub mod claims;
pub mod policies;
pub mod reports;

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use core_kernel::Page;

/// `?limit=&offset=` on list endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

pub(crate) fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_positive"))
    }
}

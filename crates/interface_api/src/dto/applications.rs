//! Application DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use core_kernel::PlanId;
use domain_billing::PaymentMethod;

#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    pub plan_id: PlanId,
}

/// A premium payment, for an application or a renewed policy
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentRequest {
    #[validate(custom(function = "super::positive_amount"))]
    pub amount: Decimal,
    pub method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_request_parses_method() {
        let request: PaymentRequest =
            serde_json::from_str(r#"{"amount": "702", "method": "credit_card"}"#).unwrap();
        assert_eq!(request.amount, dec!(702));
        assert_eq!(request.method, PaymentMethod::CreditCard);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_payment_rejected() {
        let request = PaymentRequest {
            amount: dec!(0),
            method: PaymentMethod::CreditCard,
        };
        assert!(request.validate().is_err());
    }
}

//! Shared field validators
//!
//! Every workflow validates its input with these helpers so that a failure
//! always carries the offending field name and a stable machine-readable code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable reason a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    Required,
    InvalidValue,
    InvalidStatus,
    InvalidRange,
    MustBePositive,
    InvalidTransition,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::Required => "required",
            ValidationCode::InvalidValue => "invalid_value",
            ValidationCode::InvalidStatus => "invalid_status",
            ValidationCode::InvalidRange => "invalid_range",
            ValidationCode::MustBePositive => "must_be_positive",
            ValidationCode::InvalidTransition => "invalid_transition",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field}: {message} ({code})")]
pub struct FieldError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, ValidationCode::Required, "is required")
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, ValidationCode::InvalidValue, message)
    }
}

/// Rejects empty and whitespace-only strings
pub fn require_non_blank(field: &str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::required(field));
    }
    Ok(())
}

/// Unwraps an optional value or reports the field as missing
pub fn require_present<T>(field: &str, value: Option<T>) -> Result<T, FieldError> {
    value.ok_or_else(|| FieldError::required(field))
}

/// Requires an optional string to be present and non-blank
pub fn require_text(field: &str, value: Option<&str>) -> Result<(), FieldError> {
    match value {
        Some(text) => require_non_blank(field, text),
        None => Err(FieldError::required(field)),
    }
}

pub fn require_positive(field: &str, value: Decimal) -> Result<(), FieldError> {
    if value <= Decimal::ZERO {
        return Err(FieldError::new(field, ValidationCode::MustBePositive, "must be greater than zero"));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: Decimal) -> Result<(), FieldError> {
    if value < Decimal::ZERO {
        return Err(FieldError::new(field, ValidationCode::MustBePositive, "must not be negative"));
    }
    Ok(())
}

/// Requires `min <= value <= max`
pub fn require_within<T>(field: &str, value: T, min: T, max: T) -> Result<(), FieldError>
where
    T: PartialOrd + fmt::Display,
{
    if value < min || value > max {
        return Err(FieldError::new(
            field,
            ValidationCode::InvalidRange,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_strings_are_required() {
        let err = require_non_blank("vehicle_make", "   ").unwrap_err();
        assert_eq!(err.field, "vehicle_make");
        assert_eq!(err.code, ValidationCode::Required);
        assert!(require_non_blank("vehicle_make", "Toyota").is_ok());
    }

    #[test]
    fn test_require_text_rejects_missing() {
        assert!(require_text("reason", None).is_err());
        assert!(require_text("reason", Some("")).is_err());
        assert!(require_text("reason", Some("duplicate")).is_ok());
    }

    #[test]
    fn test_positive_amounts() {
        assert_eq!(
            require_positive("claim_amount", dec!(0)).unwrap_err().code,
            ValidationCode::MustBePositive
        );
        assert!(require_positive("claim_amount", dec!(0.01)).is_ok());
        assert!(require_non_negative("approved_amount", dec!(0)).is_ok());
    }

    #[test]
    fn test_require_within_reports_range() {
        let err = require_within("driver_age", 12u32, 16, 100).unwrap_err();
        assert_eq!(err.code, ValidationCode::InvalidRange);
        assert!(err.message.contains("16"));
    }
}

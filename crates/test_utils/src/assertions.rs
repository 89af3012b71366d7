//! Custom Test Assertions
//!
//! Assertion helpers for lifecycle results that print the offending value
//! instead of a bare `assertion failed`.

use rust_decimal::Decimal;

use app_lifecycle::{ConflictCode, LifecycleError};
use core_kernel::{SequenceKind, ValidationCode};

/// Asserts two amounts differ by no more than `tolerance`
pub fn assert_amount_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Amounts differ by more than tolerance: actual={actual}, expected={expected}, diff={diff}, tolerance={tolerance}"
    );
}

/// Asserts the result failed with a conflict carrying `code`
pub fn assert_conflict<T: std::fmt::Debug>(result: Result<T, LifecycleError>, code: ConflictCode) {
    match result {
        Err(err) => assert_eq!(
            err.conflict_code(),
            Some(code),
            "Expected conflict {code}, got error: {err}"
        ),
        Ok(value) => panic!("Expected conflict {code}, got success: {value:?}"),
    }
}

/// Asserts the result failed validation on `field` with `code`
pub fn assert_validation<T: std::fmt::Debug>(result: Result<T, LifecycleError>, field: &str, code: ValidationCode) {
    match result {
        Err(LifecycleError::Validation {
            field: actual_field,
            code: actual_code,
            message,
        }) => {
            assert_eq!(actual_field, field, "Validation failed on the wrong field: {message}");
            assert_eq!(actual_code, code, "Wrong validation code for '{field}': {message}");
        }
        Err(other) => panic!("Expected validation error on '{field}', got: {other}"),
        Ok(value) => panic!("Expected validation error on '{field}', got success: {value:?}"),
    }
}

/// Asserts the result was refused for lack of permission
pub fn assert_unauthorized<T: std::fmt::Debug>(result: Result<T, LifecycleError>) {
    match result {
        Err(LifecycleError::Authorization(_)) => {}
        Err(other) => panic!("Expected authorization error, got: {other}"),
        Ok(value) => panic!("Expected authorization error, got success: {value:?}"),
    }
}

/// Asserts `number` is well formed for `kind`: code, date bucket and zero-padded counter
pub fn assert_number_format(number: &str, kind: SequenceKind) {
    let parts: Vec<&str> = number.split('-').collect();
    assert_eq!(parts.len(), 3, "Number '{number}' should have three dash-separated parts");
    assert_eq!(parts[0], kind.code(), "Number '{number}' has the wrong code for {kind}");

    let bucket_len = match kind {
        SequenceKind::VehicleClaim | SequenceKind::HealthClaim => 4,
        _ => 8,
    };
    assert!(
        parts[1].len() == bucket_len && parts[1].chars().all(|c| c.is_ascii_digit()),
        "Number '{number}' has a malformed date bucket"
    );
    assert!(
        parts[2].len() >= kind.width() && parts[2].chars().all(|c| c.is_ascii_digit()),
        "Number '{number}' has a malformed counter"
    );
}

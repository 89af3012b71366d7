//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
///
/// Domain failures carry their own error types; this one covers settings
/// that are rejected before any workflow runs.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }
}

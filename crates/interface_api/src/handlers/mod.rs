//! Request handlers, one module per resource

pub mod applications;
pub mod claims;
pub mod health;
pub mod plans;
pub mod policies;
pub mod reports;

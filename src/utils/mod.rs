//! Utility modules
//!
//! - **error**: error type, classification, sanitization and recovery
//!   (retries, backoff, circuit breakers)

pub mod error;

pub use error::{ErrorCategory, ErrorUtils};

//! Error Handling utilities
//!
//! This module provides error types, failure classification and the recovery
//! primitives (retry, backoff, circuit breaking) built on top of them.

pub mod error;
pub mod recovery;
pub mod utils;

// Re-export commonly used types and functions
pub use error::*;
pub use recovery::*;
pub use utils::{ErrorCategory, ErrorClassification, ErrorUtils};

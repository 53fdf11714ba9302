//! Error handling for the resilience layer
//!
//! This module defines all error types used throughout the crate.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ERROR_TYPE_HEADER, ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};

//! Common test utilities for nosh-guard
//!
//! # Usage
//!
//! ```rust
//! use crate::common::fixtures::{RequestFactory, HandlerFactory};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let (handler, calls) = HandlerFactory::counting();
//!     let request = RequestFactory::get("/api/dishes");
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{ConfigFactory, HandlerFactory, RequestFactory};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

//! Test suite for nosh-guard
//!
//! ## Test Categories
//!
//! ### 1. Common Utilities (`common/`)
//! Shared test infrastructure including:
//! - Request and handler factories
//! - Custom assertions for error envelopes and headers
//!
//! ### 2. Integration Tests (`integration/`)
//! Tests that verify component interactions:
//! - Pipelines mounted on a real actix app
//! - Outbound fetches against a mock upstream
//! - Configuration loading and validation
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test
//!
//! # Run only unit tests
//! cargo test --lib
//!
//! # Run integration tests
//! cargo test --test lib
//! ```

pub mod common;
pub mod integration;

//! Integration tests for nosh-guard
//!
//! These tests verify the interaction between multiple components:
//! pipelines mounted on actix, the retrying HTTP client against a mock
//! upstream, and configuration loading.

pub mod config_validation_tests;
pub mod error_handling_tests;
pub mod fetch_tests;
pub mod pipeline_tests;

//! Configuration validation
//!
//! - `trait_def`: core Validate trait definition
//! - `config_validators`: gateway, server, security and breaker validators
//! - `pipeline_validators`: pipeline, rate limit, retry and cache validators

mod config_validators;
mod pipeline_validators;
mod trait_def;

pub use trait_def::Validate;

//! Per-request outcome tags

use crate::utils::error::ErrorCategory;
use serde::Serialize;

/// How a request through a pipeline ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    Success,
    RateLimited,
    SecurityRejected,
    Timeout,
    UpstreamError,
    ValidationError,
}

impl From<ErrorCategory> for RequestOutcome {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::RateLimited => RequestOutcome::RateLimited,
            ErrorCategory::SecurityRejected => RequestOutcome::SecurityRejected,
            ErrorCategory::ValidationError => RequestOutcome::ValidationError,
            ErrorCategory::TimeoutError | ErrorCategory::UpstreamTimeout => {
                RequestOutcome::Timeout
            }
            _ => RequestOutcome::UpstreamError,
        }
    }
}

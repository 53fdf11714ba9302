//! Exponential backoff delays

use super::types::{MAX_JITTER, RetryConfig};
use rand::Rng;
use std::time::Duration;

/// Delay before retrying after `attempt` failed attempts.
///
/// `min(max, base * multiplier^(attempt - 1))`, with attempt numbering
/// starting at 1. Oversized or non-finite products saturate at `max`.
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration, multiplier: f64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
    let millis = base.as_millis() as f64 * multiplier.powi(exponent);
    if !millis.is_finite() || millis >= max.as_millis() as f64 {
        return max;
    }
    Duration::from_millis(millis.max(0.0) as u64)
}

/// Add a uniformly random amount in `[0, 1s)` to `delay`
pub fn with_jitter(delay: Duration) -> Duration {
    let extra = rand::thread_rng().gen_range(0..MAX_JITTER.as_millis() as u64);
    delay + Duration::from_millis(extra)
}

impl RetryConfig {
    /// Delay to sleep after `attempt` failed attempts under this configuration
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = backoff_delay(
            attempt,
            self.base_delay,
            self.max_delay,
            self.backoff_multiplier,
        );
        if self.jitter { with_jitter(delay) } else { delay }
    }
}

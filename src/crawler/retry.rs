//! Render retry policy

use crate::render::RenderFailure;
use std::time::Duration;

/// How often a failed render is attempted again
///
/// | Failure | Retried |
/// |---------|---------|
/// | No response | yes |
/// | Navigation exception (timeout, transport) | yes |
/// | HTTP 429 / 5xx | yes |
/// | Other HTTP errors | no |
/// | Download error | no |
///
/// The default makes a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per URL, including the first
    pub max_attempts: u32,

    /// Pause before each new attempt
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// One attempt, no retries
    pub fn single() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Returns true if `attempt` (1-based) failed with a reason worth retrying
    /// and the budget allows another try
    pub fn should_retry(&self, attempt: u32, failure: &RenderFailure) -> bool {
        attempt < self.max_attempts && failure.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single()
    }
}

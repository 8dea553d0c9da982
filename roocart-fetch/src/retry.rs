//! Fixed-delay backoff for rate-limited operations.

use std::time::Duration;
use tracing::warn;

/// Default wait after a rate-limit response, in seconds.
pub const DEFAULT_WAIT_SECS: u64 = 5;

/// Waits a constant interval before an operation is retried.
///
/// There is no growth, no jitter and no attempt limit: every rate-limit
/// response costs exactly one `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    /// Creates a backoff with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Creates a backoff with a delay in whole seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Disables waiting entirely.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns the configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Blocks the caller for one delay.
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        warn!(wait_secs = self.delay.as_secs_f64(), "Too many requests, waiting");
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::from_secs(DEFAULT_WAIT_SECS)
    }
}

use std::time::Duration;

/// Bounded exponential backoff for requests that never reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Attempts after the first one.
  pub retries: u32,
  /// Delay before the first retry; doubles for each subsequent one.
  pub backoff: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      retries: 5,
      backoff: Duration::from_millis(100),
    }
  }
}

impl RetryPolicy {
  /// Delay before retry number `attempt` (0-based).
  pub fn delay(&self, attempt: u32) -> Duration {
    self.backoff.saturating_mul(2u32.saturating_pow(attempt))
  }
}

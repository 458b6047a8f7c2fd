use std::time::Duration;

const BACKOFF_FACTOR: u32 = 2;

/// Tracks consecutive fetch failures and derives the delay before the next cycle.
///
/// With `max_delay == base_delay` the delay never grows, which is the default
/// fixed-interval behaviour.
#[derive(Debug, Clone)]
pub struct RetryState {
    base_delay: Duration,
    max_delay: Duration,
    consecutive_failures: u32,
}

impl RetryState {
    pub fn fixed(base_delay: Duration) -> Self {
        Self::with_backoff(base_delay, base_delay)
    }

    pub fn with_backoff(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay: max_delay.max(base_delay),
            consecutive_failures: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    pub fn current_delay(&self) -> Duration {
        if self.consecutive_failures == 0 {
            return self.base_delay;
        }

        let factor = BACKOFF_FACTOR.saturating_pow(self.consecutive_failures - 1);
        let delay_ms = (self.base_delay.as_millis() as u64).saturating_mul(factor as u64);

        Duration::from_millis(delay_ms).min(self.max_delay)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_in_backoff(&self) -> bool {
        self.consecutive_failures > 0
    }
}

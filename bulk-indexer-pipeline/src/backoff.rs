//! Retry backoff policy.

use std::time::Duration;

/// How long to wait between attempts of a failed batch, and how many times to
/// try again.
///
/// The delay before retry `n` (counting from zero) is
/// `initial_delay * multiplier^n`, capped at `max_delay` when one is set.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_retries: u32,
    pub multiplier: f64,
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(50),
            max_retries: 8,
            multiplier: 2.0,
            max_delay: Some(Duration::from_secs(5)),
        }
    }
}

impl RetryPolicy {
    /// Never retry.
    pub fn no_backoff() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_retries: 0,
            multiplier: 1.0,
            max_delay: None,
        }
    }

    /// Retry `max_retries` times, waiting `delay` before each retry.
    pub fn constant(delay: Duration, max_retries: u32) -> Self {
        Self {
            initial_delay: delay,
            max_retries,
            multiplier: 1.0,
            max_delay: None,
        }
    }

    /// Retry `max_retries` times, growing the delay by `multiplier` each time.
    pub fn exponential(initial_delay: Duration, max_retries: u32, multiplier: f64) -> Self {
        Self {
            initial_delay,
            max_retries,
            multiplier,
            max_delay: None,
        }
    }

    /// Cap every delay at `max_delay`.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Delay before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);

        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// Every delay this policy will wait, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|retry| self.delay_for(retry))
    }
}

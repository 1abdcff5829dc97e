//! Configuration types for the bulk processor.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::backoff::RetryPolicy;
use crate::errors::BulkError;

/// Default number of operations that triggers a flush.
pub const DEFAULT_MAX_OPERATIONS: usize = 1000;

/// Default accumulated size that triggers a flush (5 MiB).
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Default number of batches allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 1;

/// Options for a [`BulkProcessor`](crate::BulkProcessor), fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkProcessorConfig {
    /// Flush once this many operations are pending. `None` disables the trigger.
    pub max_operations: Option<usize>,
    /// Flush once pending operations add up to this many bytes. `None` disables the trigger.
    pub max_bytes: Option<usize>,
    /// Flush a non-empty buffer once this long has passed since the last flush.
    /// `None` disables the timer.
    pub flush_interval: Option<Duration>,
    /// Batches allowed in flight at once. `0` runs every sink call inline,
    /// one at a time, on the submitting task.
    pub max_concurrent_batches: usize,
    /// Backoff applied to retryable transport failures.
    pub retry: RetryPolicy,
    /// Resend items the sink rejected with a retryable flag (back-pressure).
    /// Other item failures are always reported as they are.
    pub retry_rejected_items: bool,
}

impl Default for BulkProcessorConfig {
    fn default() -> Self {
        Self {
            max_operations: Some(DEFAULT_MAX_OPERATIONS),
            max_bytes: Some(DEFAULT_MAX_BYTES),
            flush_interval: None,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
            retry: RetryPolicy::default(),
            retry_rejected_items: false,
        }
    }
}

impl BulkProcessorConfig {
    /// Set the operation count trigger.
    pub fn with_max_operations(mut self, max_operations: usize) -> Self {
        self.max_operations = Some(max_operations);
        self
    }

    /// Set the byte size trigger.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Set the time trigger.
    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = Some(flush_interval);
        self
    }

    /// Set how many batches may be in flight at once.
    pub fn with_max_concurrent_batches(mut self, max_concurrent_batches: usize) -> Self {
        self.max_concurrent_batches = max_concurrent_batches;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable resending of back-pressured items.
    pub fn with_retry_rejected_items(mut self, enabled: bool) -> Self {
        self.retry_rejected_items = enabled;
        self
    }

    /// Check the options for values that cannot work.
    pub fn validate(&self) -> Result<(), BulkError> {
        if self.max_operations == Some(0) {
            return Err(BulkError::config("max_operations must be greater than zero"));
        }
        if self.max_bytes == Some(0) {
            return Err(BulkError::config("max_bytes must be greater than zero"));
        }
        if self.flush_interval == Some(Duration::ZERO) {
            return Err(BulkError::config("flush_interval must be greater than zero"));
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return Err(BulkError::config(format!(
                "retry multiplier must be a finite number >= 1.0, got {}",
                self.retry.multiplier
            )));
        }
        Ok(())
    }

    /// Build a config from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BULK_MAX_OPERATIONS`: operation count trigger, `-1` disables (default: 1000)
    /// - `BULK_MAX_BYTES`: byte size trigger, `-1` disables (default: 5 MiB)
    /// - `BULK_FLUSH_INTERVAL_MS`: time trigger in milliseconds (default: unset)
    /// - `BULK_CONCURRENT_REQUESTS`: batches in flight, `0` for inline (default: 1)
    /// - `BULK_MAX_RETRIES`: retries per batch (default: 8)
    /// - `BULK_INITIAL_RETRY_DELAY_MS`: first retry delay (default: 50)
    /// - `BULK_RETRY_MULTIPLIER`: delay growth factor (default: 2.0)
    /// - `BULK_RETRY_REJECTED_ITEMS`: resend back-pressured items (default: false)
    pub fn from_env() -> Result<Self, BulkError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BulkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BULK_MAX_OPERATIONS") {
            config.max_operations = parse_limit("BULK_MAX_OPERATIONS", &value)?;
        }
        if let Some(value) = lookup("BULK_MAX_BYTES") {
            config.max_bytes = parse_limit("BULK_MAX_BYTES", &value)?;
        }
        if let Some(value) = lookup("BULK_FLUSH_INTERVAL_MS") {
            let millis: u64 = parse("BULK_FLUSH_INTERVAL_MS", &value)?;
            config.flush_interval = Some(Duration::from_millis(millis));
        }
        if let Some(value) = lookup("BULK_CONCURRENT_REQUESTS") {
            config.max_concurrent_batches = parse("BULK_CONCURRENT_REQUESTS", &value)?;
        }
        if let Some(value) = lookup("BULK_MAX_RETRIES") {
            config.retry.max_retries = parse("BULK_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("BULK_INITIAL_RETRY_DELAY_MS") {
            let millis: u64 = parse("BULK_INITIAL_RETRY_DELAY_MS", &value)?;
            config.retry.initial_delay = Duration::from_millis(millis);
        }
        if let Some(value) = lookup("BULK_RETRY_MULTIPLIER") {
            config.retry.multiplier = parse("BULK_RETRY_MULTIPLIER", &value)?;
        }
        if let Some(value) = lookup("BULK_RETRY_REJECTED_ITEMS") {
            config.retry_rejected_items = parse("BULK_RETRY_REJECTED_ITEMS", &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, BulkError> {
    value
        .trim()
        .parse()
        .map_err(|_| BulkError::config(format!("{} has an invalid value: {:?}", key, value)))
}

/// `-1` turns a threshold off.
fn parse_limit(key: &str, value: &str) -> Result<Option<usize>, BulkError> {
    if value.trim() == "-1" {
        return Ok(None);
    }
    parse(key, value).map(Some)
}

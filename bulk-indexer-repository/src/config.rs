//! Configuration types for the OpenSearch sink.

use std::time::Duration;

/// Default OpenSearch URL.
pub const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default target index.
pub const DEFAULT_INDEX: &str = "posts";

/// Connection settings for [`OpenSearchSink`](crate::OpenSearchSink).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// The OpenSearch server URL (e.g., "http://localhost:9200").
    pub url: String,
    /// Index every bulk request is written to.
    pub index: String,
    /// Transport-level timeout for a single request. `None` uses the client default.
    pub timeout: Option<Duration>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OPENSEARCH_URL.to_string(),
            index: DEFAULT_INDEX.to_string(),
            timeout: None,
        }
    }
}

impl SinkConfig {
    pub fn new(url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index: index.into(),
            timeout: None,
        }
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

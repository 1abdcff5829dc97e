//! Sink error types.
//!
//! This module defines the batch-level errors a write sink can report. Item
//! level rejections are not errors; they travel inside the sink response.

use thiserror::Error;

/// Errors that prevent a whole batch from being applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The search engine could not be reached, or answered with a gateway error.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete in time. Whether it was applied is unknown.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The search engine is shedding load (HTTP 429).
    #[error("Throttled: {0}")]
    Throttled(String),

    /// The search engine refused the request itself (e.g. a malformed body).
    #[error("Request rejected: {0}")]
    RequestRejected(String),

    /// The batch could not be encoded into a request.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The response could not be matched up with the batch that was sent.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl SinkError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a throttled error.
    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }

    /// Create a request rejected error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::RequestRejected(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Map a non-success HTTP status from the bulk endpoint to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            429 => Self::throttled(format!("status {}: {}", status, body)),
            502..=504 => Self::connection(format!("status {}: {}", status, body)),
            _ => Self::rejected(format!("status {}: {}", status, body)),
        }
    }

    /// Whether resending the same batch may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SinkError::ConnectionError(_) | SinkError::Timeout(_) | SinkError::Throttled(_) => true,
            SinkError::RequestRejected(_)
            | SinkError::SerializationError(_)
            | SinkError::MalformedResponse(_) => false,
        }
    }
}

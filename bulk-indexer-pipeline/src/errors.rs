//! Error types for the bulk processor.

use bulk_indexer_repository::SinkError;
use thiserror::Error;

/// Errors surfaced by the bulk processor, either to the submitting caller or
/// to the listener.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BulkError {
    /// The pending buffer is already full. Indicates a misconfiguration.
    #[error("Pending buffer is full ({max} operations)")]
    CapacityExceeded { max: usize },

    /// The processor has been closed.
    #[error("Bulk processor is closed")]
    Closed,

    /// A batch could not be delivered to the sink.
    #[error("Transport failure: {0}")]
    TransportFailure(#[from] SinkError),

    /// The sink rejected a single operation.
    #[error("Item {id} failed: {reason}")]
    ItemFailure { id: String, reason: String },

    /// A batch was given up on, either because its error was not retryable
    /// or because retries ran out.
    #[error("Batch failed after {attempts} attempt(s): {source}")]
    TerminalFailure {
        attempts: u32,
        #[source]
        source: SinkError,
    },

    /// Invalid processor configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BulkError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an item failure.
    pub fn item_failure(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ItemFailure {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether resending the same batch may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            BulkError::TransportFailure(source) => source.is_retryable(),
            _ => false,
        }
    }
}

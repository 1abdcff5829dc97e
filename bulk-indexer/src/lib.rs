//! # Bulk Indexer
//!
//! Entry point and configuration for running the bulk processor against
//! OpenSearch, fed by newline-delimited JSON write operations.

pub mod config;
pub mod input;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An input line could not be turned into a write operation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bulk processor error.
    #[error("Bulk error: {0}")]
    BulkError(#[from] bulk_indexer_pipeline::BulkError),

    /// Sink error.
    #[error("Sink error: {0}")]
    SinkError(#[from] bulk_indexer_repository::SinkError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

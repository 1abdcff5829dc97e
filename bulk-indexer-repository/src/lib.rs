//! # Bulk Indexer Repository
//!
//! This crate provides the sink side of the bulk indexer: the `WriteSink`
//! trait batches are delivered through, the errors a sink can report, and a
//! concrete implementation for the OpenSearch bulk API.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use config::SinkConfig;
pub use errors::SinkError;
pub use interfaces::{SinkResponse, WriteSink};
pub use opensearch::OpenSearchSink;

//! Error types for the bulk indexer repository.

mod sink_error;

pub use sink_error::SinkError;

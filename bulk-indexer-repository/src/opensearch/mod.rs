//! OpenSearch implementation of the write sink.
//!
//! This module provides a concrete implementation of `WriteSink`
//! using the OpenSearch bulk API as the backend.

mod bulk;
mod client;

pub use client::OpenSearchSink;

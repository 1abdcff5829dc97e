//! Interface definitions for the write sink.
//!
//! This module defines the abstract `WriteSink` trait that allows for
//! dependency injection and swappable bulk backends.

mod write_sink;

pub use write_sink::{SinkResponse, WriteSink};

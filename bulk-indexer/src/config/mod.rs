//! Configuration and dependency wiring for the bulk indexer binary.

mod dependencies;

pub use dependencies::Dependencies;

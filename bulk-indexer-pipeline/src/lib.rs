//! # Bulk Indexer Pipeline
//!
//! This crate provides the batch write accumulator: producers submit single
//! write operations, and the processor groups them into batches and sends
//! those batches to a `WriteSink`.
//!
//! ## Architecture
//!
//! 1. **Accumulator**: Buffers operations and decides when to cut a batch
//!    (operation count, byte size, or elapsed time)
//! 2. **Dispatcher**: Bounds how many batches are in flight at once
//! 3. **Retry Controller**: Resends batches after transport failures with
//!    exponential backoff
//! 4. **Listener**: Receives exactly one result per batch
//!
//! ```ignore
//! let processor = BulkProcessor::builder(Arc::new(sink))
//!     .listener(Arc::new(TracingListener))
//!     .config(BulkProcessorConfig::default().with_flush_interval(Duration::from_secs(5)))
//!     .build()?;
//!
//! processor.submit(WriteOperation::upsert("42", r#"{"title":"hello"}"#)).await?;
//! processor.close(Duration::from_secs(30)).await;
//! ```

mod accumulator;
pub mod backoff;
pub mod config;
mod dispatcher;
pub mod errors;
pub mod listener;
mod processor;
mod retry;
mod stats;

#[cfg(test)]
mod testing;

pub use backoff::RetryPolicy;
pub use config::BulkProcessorConfig;
pub use errors::BulkError;
pub use listener::{item_result, BulkListener, NoopListener, TracingListener};
pub use processor::{BulkProcessor, BulkProcessorBuilder};
pub use stats::StatsSnapshot;

pub use bulk_indexer_shared::{Batch, ItemOutcome, ItemStatus, OperationKind, WriteOperation};

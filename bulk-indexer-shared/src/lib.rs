//! # Bulk Indexer Shared
//!
//! Plain data types shared by the bulk indexer crates: the write operations
//! producers submit, the batches the processor cuts from them, and the
//! per-item outcomes a sink reports back.

mod batch;
mod operation;
mod outcome;

pub use batch::Batch;
pub use operation::{OperationKind, WriteOperation};
pub use outcome::{ItemOutcome, ItemStatus};

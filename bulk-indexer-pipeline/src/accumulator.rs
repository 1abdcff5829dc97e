//! Pending buffer and flush-trigger decisions.
//!
//! The accumulator itself is synchronous; the processor keeps it behind a
//! single async mutex so that buffer mutation, the decision to cut a batch and
//! the hand-off to the dispatcher happen in one critical section.

use std::mem;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::BulkProcessorConfig;
use crate::errors::BulkError;
use bulk_indexer_shared::{Batch, WriteOperation};

pub(crate) struct Accumulator {
    pending: Vec<WriteOperation>,
    pending_bytes: usize,
    next_batch_id: u64,
    last_flush: Instant,
    max_operations: Option<usize>,
    max_bytes: Option<usize>,
    flush_interval: Option<Duration>,
    closed: bool,
}

impl Accumulator {
    pub(crate) fn new(config: &BulkProcessorConfig) -> Self {
        Self {
            pending: Vec::with_capacity(config.max_operations.unwrap_or_default().min(1024)),
            pending_bytes: 0,
            next_batch_id: 1,
            last_flush: Instant::now(),
            max_operations: config.max_operations,
            max_bytes: config.max_bytes,
            flush_interval: config.flush_interval,
            closed: false,
        }
    }

    /// Append an operation, cutting a batch if a size threshold is reached.
    pub(crate) fn push(&mut self, operation: WriteOperation) -> Result<Option<Batch>, BulkError> {
        if self.closed {
            return Err(BulkError::Closed);
        }
        if let Some(max) = self.max_operations {
            if self.pending.len() >= max {
                return Err(BulkError::CapacityExceeded { max });
            }
        }

        self.pending_bytes += operation.estimated_size();
        self.pending.push(operation);

        if self.is_over_threshold() {
            Ok(Some(self.cut()))
        } else {
            Ok(None)
        }
    }

    /// Cut a batch if the buffer is non-empty and the flush interval has
    /// elapsed since the last flush.
    pub(crate) fn take_if_due(&mut self, now: Instant) -> Option<Batch> {
        let interval = self.flush_interval?;
        if self.pending.is_empty() || now.duration_since(self.last_flush) < interval {
            return None;
        }
        Some(self.cut())
    }

    /// Cut whatever is pending.
    pub(crate) fn take(&mut self) -> Option<Batch> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.cut())
        }
    }

    /// Refuse further operations and hand back the remainder.
    pub(crate) fn close(&mut self) -> Option<Batch> {
        self.closed = true;
        self.take()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    fn is_over_threshold(&self) -> bool {
        self.max_operations
            .is_some_and(|max| self.pending.len() >= max)
            || self.max_bytes.is_some_and(|max| self.pending_bytes >= max)
    }

    fn cut(&mut self) -> Batch {
        let id = self.next_batch_id;
        self.next_batch_id += 1;
        self.last_flush = Instant::now();
        self.pending_bytes = 0;

        let capacity = self.pending.len();
        Batch::new(id, mem::replace(&mut self.pending, Vec::with_capacity(capacity)))
    }
}

//! Counters for batches and operations handled by a processor.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::listener::BatchOutcome;

/// Running totals, updated as batches settle.
#[derive(Debug, Default)]
pub(crate) struct BulkStats {
    operations_submitted: AtomicU64,
    batches_dispatched: AtomicU64,
    batches_succeeded: AtomicU64,
    batches_partially_failed: AtomicU64,
    batches_failed: AtomicU64,
    operations_succeeded: AtomicU64,
    operations_failed: AtomicU64,
    retries: AtomicU64,
}

/// A point-in-time copy of a processor's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub operations_submitted: u64,
    pub batches_dispatched: u64,
    pub batches_succeeded: u64,
    pub batches_partially_failed: u64,
    pub batches_failed: u64,
    pub operations_succeeded: u64,
    pub operations_failed: u64,
    pub retries: u64,
}

impl BulkStats {
    pub(crate) fn record_submitted(&self) {
        self.operations_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatched(&self) {
        self.batches_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_outcome(&self, outcome: &BatchOutcome, operations: usize) {
        match outcome {
            BatchOutcome::Success(items) => {
                self.batches_succeeded.fetch_add(1, Ordering::Relaxed);
                self.operations_succeeded
                    .fetch_add(items.len() as u64, Ordering::Relaxed);
            }
            BatchOutcome::PartialFailure(items) => {
                let succeeded = items.iter().filter(|o| o.is_success()).count() as u64;
                self.batches_partially_failed.fetch_add(1, Ordering::Relaxed);
                self.operations_succeeded
                    .fetch_add(succeeded, Ordering::Relaxed);
                self.operations_failed
                    .fetch_add(items.len() as u64 - succeeded, Ordering::Relaxed);
            }
            BatchOutcome::TerminalFailure(_) => {
                self.batches_failed.fetch_add(1, Ordering::Relaxed);
                self.operations_failed
                    .fetch_add(operations as u64, Ordering::Relaxed);
            }
        }
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            operations_submitted: self.operations_submitted.load(Ordering::Relaxed),
            batches_dispatched: self.batches_dispatched.load(Ordering::Relaxed),
            batches_succeeded: self.batches_succeeded.load(Ordering::Relaxed),
            batches_partially_failed: self.batches_partially_failed.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            operations_succeeded: self.operations_succeeded.load(Ordering::Relaxed),
            operations_failed: self.operations_failed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
        }
    }
}

//! Result reporting for dispatched batches.

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::errors::BulkError;
use bulk_indexer_shared::{Batch, ItemOutcome};

/// Failed items logged individually per batch before summarizing.
const LOGGED_ITEM_FAILURES: usize = 5;

/// Callbacks invoked by the processor as batches move through the sink.
///
/// `before_dispatch` runs once per batch, before the first attempt. Then
/// exactly one of the `after_*` callbacks runs, exactly once. Callbacks run on
/// whichever task resolved the batch and must not block for long; a slow
/// callback holds its in-flight slot.
pub trait BulkListener: Send + Sync {
    fn before_dispatch(&self, _batch: &Batch) {}

    /// Every operation was applied. `outcomes` has one entry per operation.
    fn after_success(&self, _batch: &Batch, _outcomes: &[ItemOutcome]) {}

    /// The batch was delivered but some operations were rejected. `outcomes`
    /// has one entry per operation.
    fn after_partial_failure(&self, _batch: &Batch, _outcomes: &[ItemOutcome]) {}

    /// The batch was not applied and will not be retried.
    fn after_terminal_failure(&self, _batch: &Batch, _error: &BulkError) {}
}

/// A listener that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl BulkListener for NoopListener {}

/// A listener that logs every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl BulkListener for TracingListener {
    fn before_dispatch(&self, batch: &Batch) {
        debug!(
            batch_id = batch.id(),
            operations = batch.len(),
            size_bytes = batch.size_in_bytes(),
            "Executing bulk"
        );
    }

    fn after_success(&self, batch: &Batch, outcomes: &[ItemOutcome]) {
        let elapsed_ms = (Utc::now() - batch.created_at()).num_milliseconds();
        debug!(
            batch_id = batch.id(),
            operations = outcomes.len(),
            elapsed_ms = elapsed_ms,
            "Bulk completed"
        );
    }

    fn after_partial_failure(&self, batch: &Batch, outcomes: &[ItemOutcome]) {
        let failures: Vec<&ItemOutcome> = outcomes.iter().filter(|o| !o.is_success()).collect();

        warn!(
            batch_id = batch.id(),
            failed = failures.len(),
            operations = outcomes.len(),
            "Bulk executed with failures"
        );

        for outcome in failures.iter().take(LOGGED_ITEM_FAILURES) {
            warn!(
                batch_id = batch.id(),
                id = %outcome.id,
                kind = %outcome.kind,
                reason = outcome.failure_reason().unwrap_or_default(),
                retryable = outcome.is_retryable(),
                "Bulk item failed"
            );
        }
    }

    fn after_terminal_failure(&self, batch: &Batch, error: &BulkError) {
        error!(
            batch_id = batch.id(),
            operations = batch.len(),
            error = %error,
            "Failed to execute bulk"
        );
    }
}

/// How a batch ended, once retries are settled.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BatchOutcome {
    Success(Vec<ItemOutcome>),
    PartialFailure(Vec<ItemOutcome>),
    TerminalFailure(BulkError),
}

impl BatchOutcome {
    pub(crate) fn from_outcomes(outcomes: Vec<ItemOutcome>) -> Self {
        if outcomes.iter().all(ItemOutcome::is_success) {
            Self::Success(outcomes)
        } else {
            Self::PartialFailure(outcomes)
        }
    }

    /// Report this outcome to `listener`.
    pub(crate) fn notify(&self, listener: &dyn BulkListener, batch: &Batch) {
        match self {
            BatchOutcome::Success(outcomes) => listener.after_success(batch, outcomes),
            BatchOutcome::PartialFailure(outcomes) => {
                listener.after_partial_failure(batch, outcomes)
            }
            BatchOutcome::TerminalFailure(error) => listener.after_terminal_failure(batch, error),
        }
    }
}

/// Convert a failed item outcome into an error.
pub fn item_result(outcome: &ItemOutcome) -> Result<(), BulkError> {
    match outcome.failure_reason() {
        None => Ok(()),
        Some(reason) => Err(BulkError::item_failure(outcome.id.clone(), reason)),
    }
}

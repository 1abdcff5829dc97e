//! Retry controller: drives one batch through the sink until it settles.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::backoff::RetryPolicy;
use crate::errors::BulkError;
use crate::listener::BatchOutcome;
use crate::stats::BulkStats;
use bulk_indexer_repository::{SinkError, SinkResponse, WriteSink};
use bulk_indexer_shared::{Batch, ItemOutcome};

pub(crate) struct RetryController {
    sink: Arc<dyn WriteSink>,
    policy: RetryPolicy,
    retry_rejected_items: bool,
    stats: Arc<BulkStats>,
}

impl RetryController {
    pub(crate) fn new(
        sink: Arc<dyn WriteSink>,
        policy: RetryPolicy,
        retry_rejected_items: bool,
        stats: Arc<BulkStats>,
    ) -> Self {
        Self {
            sink,
            policy,
            retry_rejected_items,
            stats,
        }
    }

    /// Send `batch` until it succeeds, fails for good, or retries run out.
    ///
    /// A retryable transport failure resends the batch as it was last sent.
    /// Item-level failures never resend the whole batch; when enabled, only the
    /// back-pressured items are resent, drawing on the same retry budget. If a
    /// resend of those items fails at the transport level, the outcomes already
    /// known are reported as they stand.
    pub(crate) async fn execute(&self, batch: &Batch) -> BatchOutcome {
        let mut retries: u32 = 0;
        let mut outcomes: Vec<Option<ItemOutcome>> = vec![None; batch.len()];
        // Original positions of the operations in the batch currently being sent.
        let mut positions: Vec<usize> = (0..batch.len()).collect();
        let mut subset: Option<Batch> = None;

        loop {
            let current = subset.as_ref().unwrap_or(batch);

            match self.attempt(current).await {
                Ok(response) => {
                    let mut requeue = Vec::new();

                    for mut outcome in response.into_outcomes() {
                        let original = positions[outcome.position];
                        outcome.position = original;
                        if self.retry_rejected_items && outcome.is_retryable() {
                            requeue.push(original);
                        }
                        outcomes[original] = Some(outcome);
                    }

                    if requeue.is_empty() || retries >= self.policy.max_retries {
                        break;
                    }

                    self.backoff(batch, retries, requeue.len(), "Resending rejected items")
                        .await;
                    retries += 1;

                    let operations = requeue
                        .iter()
                        .map(|&position| batch.operations()[position].clone())
                        .collect();
                    subset = Some(Batch::new(batch.id(), operations));
                    positions = requeue;
                }
                Err(error) => {
                    if error.is_retryable() && retries < self.policy.max_retries {
                        warn!(
                            batch_id = batch.id(),
                            attempt = retries + 1,
                            max_retries = self.policy.max_retries,
                            error = %error,
                            "Bulk request failed, retrying"
                        );
                        self.backoff(batch, retries, current.len(), "Resending batch")
                            .await;
                        retries += 1;
                        continue;
                    }

                    if subset.is_some() {
                        // Every position already holds the outcome from an earlier response.
                        warn!(
                            batch_id = batch.id(),
                            error = %error,
                            "Resending rejected items failed, reporting last known outcomes"
                        );
                        break;
                    }

                    let source = match error {
                        BulkError::TransportFailure(source) => source,
                        other => SinkError::rejected(other.to_string()),
                    };
                    return BatchOutcome::TerminalFailure(BulkError::TerminalFailure {
                        attempts: retries + 1,
                        source,
                    });
                }
            }
        }

        if retries > 0 {
            debug!(batch_id = batch.id(), retries = retries, "Bulk settled after retry");
        }

        BatchOutcome::from_outcomes(outcomes.into_iter().flatten().collect())
    }

    /// One call to the sink, with the response checked against the batch.
    async fn attempt(&self, batch: &Batch) -> Result<SinkResponse, BulkError> {
        let response = self.sink.write_batch(batch).await?;
        check_outcomes(batch, response.outcomes())?;
        Ok(response)
    }

    async fn backoff(&self, batch: &Batch, retry: u32, operations: usize, message: &str) {
        let delay = self.policy.delay_for(retry);
        self.stats.record_retry();
        debug!(
            batch_id = batch.id(),
            retry = retry + 1,
            operations = operations,
            delay_ms = delay.as_millis() as u64,
            "{}",
            message
        );
        tokio::time::sleep(delay).await;
    }
}

/// Each operation of `batch` must have exactly one outcome.
fn check_outcomes(batch: &Batch, outcomes: &[ItemOutcome]) -> Result<(), SinkError> {
    if outcomes.len() != batch.len() {
        return Err(SinkError::malformed(format!(
            "Sink reported {} outcomes for {} operations",
            outcomes.len(),
            batch.len()
        )));
    }

    let mut seen = vec![false; batch.len()];
    for outcome in outcomes {
        match seen.get_mut(outcome.position) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(SinkError::malformed(format!(
                    "Sink reported an invalid or duplicate position {}",
                    outcome.position
                )))
            }
        }
    }
    Ok(())
}

//! Concurrency gate between the accumulator and the sink.

use std::future::{self, Future};
use std::pin::pin;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{oneshot, OwnedSemaphorePermit, Semaphore};

use crate::listener::BulkListener;
use crate::retry::RetryController;
use crate::stats::BulkStats;
use bulk_indexer_shared::Batch;

/// Hands batches to the retry controller, at most `permits` at a time.
///
/// In concurrent mode each batch runs on its own task and `dispatch` returns
/// as soon as a slot is taken. A spawned batch does not call the sink before
/// the batch dispatched ahead of it has, so sink calls start in dispatch
/// order whatever thread each task lands on. In inline mode the batch runs on
/// the caller's task and `dispatch` returns once it has settled.
pub(crate) struct Dispatcher {
    controller: Arc<RetryController>,
    listener: Arc<dyn BulkListener>,
    stats: Arc<BulkStats>,
    semaphore: Arc<Semaphore>,
    permits: u32,
    concurrent: bool,
    /// Fires once the most recently spawned batch has started its sink call.
    last_started: Mutex<Option<oneshot::Receiver<()>>>,
}

impl Dispatcher {
    /// `max_concurrent_batches == 0` selects inline mode with a single slot.
    pub(crate) fn new(
        controller: Arc<RetryController>,
        listener: Arc<dyn BulkListener>,
        stats: Arc<BulkStats>,
        max_concurrent_batches: usize,
    ) -> Self {
        let permits = u32::try_from(max_concurrent_batches.max(1)).unwrap_or(u32::MAX);

        Self {
            controller,
            listener,
            stats,
            semaphore: Arc::new(Semaphore::new(permits as usize)),
            permits,
            concurrent: max_concurrent_batches > 0,
            last_started: Mutex::new(None),
        }
    }

    /// Wait for a free slot, then send `batch`.
    ///
    /// Callers that need batches to reach the sink in creation order must not
    /// call this concurrently; the semaphore is fair, so serialized callers
    /// take slots in call order.
    pub(crate) async fn dispatch(&self, batch: Batch) {
        self.stats.record_dispatched();
        self.listener.before_dispatch(&batch);

        // The semaphore is never closed, so a permit is always granted.
        let permit = self.semaphore.clone().acquire_owned().await.ok();

        let controller = self.controller.clone();
        let listener = self.listener.clone();
        let stats = self.stats.clone();

        if !self.concurrent {
            run_batch(controller, listener, stats, batch, permit, None).await;
            return;
        }

        let (started_tx, started_rx) = oneshot::channel();
        let previous = self
            .last_started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(started_rx);

        tokio::spawn(async move {
            if let Some(previous) = previous {
                // An error means the previous task ended without starting.
                let _ = previous.await;
            }
            run_batch(controller, listener, stats, batch, permit, Some(started_tx)).await;
        });
    }

    /// Batches currently holding a slot.
    pub(crate) fn in_flight(&self) -> usize {
        (self.permits as usize).saturating_sub(self.semaphore.available_permits())
    }

    /// Wait until no batch holds a slot.
    pub(crate) async fn await_idle(&self) -> bool {
        self.semaphore.acquire_many(self.permits).await.is_ok()
    }
}

async fn run_batch(
    controller: Arc<RetryController>,
    listener: Arc<dyn BulkListener>,
    stats: Arc<BulkStats>,
    batch: Batch,
    permit: Option<OwnedSemaphorePermit>,
    mut started: Option<oneshot::Sender<()>>,
) {
    let mut execute = pin!(controller.execute(&batch));
    let outcome = future::poll_fn(|cx| {
        let poll = execute.as_mut().poll(cx);
        if let Some(started) = started.take() {
            let _ = started.send(());
        }
        poll
    })
    .await;

    stats.record_outcome(&outcome, batch.len());
    outcome.notify(listener.as_ref(), &batch);
    // Released only after the listener has seen the outcome.
    drop(permit);
}

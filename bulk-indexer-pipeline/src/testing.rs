//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::errors::BulkError;
use crate::listener::BulkListener;
use bulk_indexer_repository::{SinkError, SinkResponse, WriteSink};
use bulk_indexer_shared::{Batch, ItemOutcome};

/// What the mock sink does with the next request.
#[derive(Debug, Clone)]
pub(crate) enum MockReply {
    Succeed,
    Fail(SinkError),
    RejectItems { positions: Vec<usize>, retryable: bool },
    /// Report one outcome fewer than the batch has operations.
    DropLastOutcome,
}

/// A sink that answers from a script and records what it was sent.
///
/// Once the script runs out every request succeeds.
pub(crate) struct MockSink {
    replies: Mutex<VecDeque<MockReply>>,
    delay: Duration,
    sent: Mutex<Vec<Vec<String>>>,
    events: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl MockSink {
    pub(crate) fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    pub(crate) fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            delay: Duration::ZERO,
            sent: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    /// Make every request take `delay`.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) async fn call_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Ids of the operations of each request, in arrival order.
    pub(crate) async fn sent_ids(&self) -> Vec<Vec<String>> {
        self.sent.lock().await.clone()
    }

    /// `start:<batch id>` and `end:<batch id>` entries, in the order they happened.
    pub(crate) async fn events(&self) -> Vec<String> {
        self.events.lock().await.clone()
    }

    pub(crate) fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WriteSink for MockSink {
    async fn write_batch(&self, batch: &Batch) -> Result<SinkResponse, SinkError> {
        {
            let mut sent = self.sent.lock().await;
            sent.push(batch.operations().iter().map(|op| op.id().to_string()).collect());
            self.events.lock().await.push(format!("start:{}", batch.id()));
        }

        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = self.replies.lock().await.pop_front().unwrap_or(MockReply::Succeed);

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().await.push(format!("end:{}", batch.id()));

        let mut outcomes: Vec<ItemOutcome> = batch
            .operations()
            .iter()
            .enumerate()
            .map(|(position, op)| ItemOutcome::succeeded(position, op))
            .collect();

        match reply {
            MockReply::Succeed => {}
            MockReply::Fail(error) => return Err(error),
            MockReply::RejectItems {
                positions,
                retryable,
            } => {
                for position in positions {
                    outcomes[position] = ItemOutcome::failed(
                        position,
                        &batch.operations()[position],
                        "es_rejected_execution_exception",
                        retryable,
                    );
                }
            }
            MockReply::DropLastOutcome => {
                outcomes.pop();
            }
        }

        Ok(SinkResponse::from_outcomes(outcomes))
    }
}

/// A listener callback, reduced to what the tests compare.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ListenerEvent {
    /// Batch id and operation count.
    Before(u64, usize),
    /// Batch id and outcome count.
    Success(u64, usize),
    Partial(u64, Vec<ItemOutcome>),
    Terminal(u64, BulkError),
}

#[derive(Default)]
pub(crate) struct RecordingListener {
    events: StdMutex<Vec<ListenerEvent>>,
}

impl RecordingListener {
    pub(crate) fn events(&self) -> Vec<ListenerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn successes(&self) -> usize {
        self.count(|e| matches!(e, ListenerEvent::Success(..)))
    }

    pub(crate) fn terminal_failures(&self) -> usize {
        self.count(|e| matches!(e, ListenerEvent::Terminal(..)))
    }

    fn count(&self, predicate: impl Fn(&ListenerEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: ListenerEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl BulkListener for RecordingListener {
    fn before_dispatch(&self, batch: &Batch) {
        self.push(ListenerEvent::Before(batch.id(), batch.len()));
    }

    fn after_success(&self, batch: &Batch, outcomes: &[ItemOutcome]) {
        self.push(ListenerEvent::Success(batch.id(), outcomes.len()));
    }

    fn after_partial_failure(&self, batch: &Batch, outcomes: &[ItemOutcome]) {
        self.push(ListenerEvent::Partial(batch.id(), outcomes.to_vec()));
    }

    fn after_terminal_failure(&self, batch: &Batch, error: &BulkError) {
        self.push(ListenerEvent::Terminal(batch.id(), error.clone()));
    }
}

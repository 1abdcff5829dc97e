//! The bulk processor facade: submit, tick, flush and close.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::accumulator::Accumulator;
use crate::config::BulkProcessorConfig;
use crate::dispatcher::Dispatcher;
use crate::errors::BulkError;
use crate::listener::{BulkListener, NoopListener};
use crate::retry::RetryController;
use crate::stats::{BulkStats, StatsSnapshot};
use bulk_indexer_repository::WriteSink;
use bulk_indexer_shared::WriteOperation;

/// Builder for [`BulkProcessor`].
pub struct BulkProcessorBuilder {
    sink: Arc<dyn WriteSink>,
    listener: Arc<dyn BulkListener>,
    config: BulkProcessorConfig,
}

impl BulkProcessorBuilder {
    /// Report batch results to `listener`. Defaults to [`NoopListener`].
    pub fn listener(mut self, listener: Arc<dyn BulkListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: BulkProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and start the processor.
    ///
    /// When a flush interval is configured this spawns the flush timer, so it
    /// must be called from within a Tokio runtime.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkProcessor)` - Ready to accept operations
    /// * `Err(BulkError::ConfigError)` - Invalid configuration, or no runtime for the timer
    pub fn build(self) -> Result<BulkProcessor, BulkError> {
        self.config.validate()?;

        let stats = Arc::new(BulkStats::default());
        let controller = Arc::new(RetryController::new(
            self.sink,
            self.config.retry.clone(),
            self.config.retry_rejected_items,
            stats.clone(),
        ));
        let dispatcher = Dispatcher::new(
            controller,
            self.listener,
            stats.clone(),
            self.config.max_concurrent_batches,
        );

        let inner = Arc::new(Inner {
            accumulator: Mutex::new(Accumulator::new(&self.config)),
            dispatcher,
            stats,
            closing: AtomicBool::new(false),
            closed: OnceCell::new(),
        });

        if let Some(interval) = self.config.flush_interval {
            let handle = tokio::runtime::Handle::try_current().map_err(|_| {
                BulkError::config("flush_interval requires a running Tokio runtime")
            })?;
            handle.spawn(run_ticker(Arc::downgrade(&inner), interval));
        }

        info!(
            max_operations = ?self.config.max_operations,
            max_bytes = ?self.config.max_bytes,
            flush_interval_ms = ?self.config.flush_interval.map(|d| d.as_millis()),
            max_concurrent_batches = self.config.max_concurrent_batches,
            max_retries = self.config.retry.max_retries,
            "Bulk processor started"
        );

        Ok(BulkProcessor { inner })
    }
}

/// Accumulates write operations and sends them to a [`WriteSink`] in batches.
///
/// Cloning is cheap; clones share the same buffer and in-flight batches.
/// Call [`close`](Self::close) before dropping the last clone, otherwise
/// operations still pending are never sent.
#[derive(Clone)]
pub struct BulkProcessor {
    inner: Arc<Inner>,
}

struct Inner {
    accumulator: Mutex<Accumulator>,
    dispatcher: Dispatcher,
    stats: Arc<BulkStats>,
    closing: AtomicBool,
    closed: OnceCell<bool>,
}

impl BulkProcessor {
    /// Start building a processor that writes to `sink`.
    pub fn builder(sink: Arc<dyn WriteSink>) -> BulkProcessorBuilder {
        BulkProcessorBuilder {
            sink,
            listener: Arc::new(NoopListener),
            config: BulkProcessorConfig::default(),
        }
    }

    /// Add an operation to the pending buffer.
    ///
    /// If the operation makes the buffer reach a size threshold, the buffer is
    /// cut into a batch and dispatched before this returns. With a full
    /// dispatcher that means waiting for a free slot; in inline mode it means
    /// waiting for the batch to settle.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The operation is buffered or on its way to the sink
    /// * `Err(BulkError::Closed)` - `close` has been called
    /// * `Err(BulkError::CapacityExceeded)` - The buffer is full
    pub async fn submit(&self, operation: WriteOperation) -> Result<(), BulkError> {
        self.inner.submit(operation).await
    }

    /// Flush the buffer if the flush interval has elapsed since the last flush.
    ///
    /// The processor calls this on its own when a flush interval is
    /// configured; calling it by hand is harmless.
    pub async fn tick(&self) -> Result<(), BulkError> {
        self.inner.tick().await
    }

    /// Flush whatever is pending now, regardless of thresholds.
    pub async fn flush(&self) -> Result<(), BulkError> {
        let mut accumulator = self.inner.accumulator.lock().await;
        if self.inner.is_closing(&accumulator) {
            return Err(BulkError::Closed);
        }
        if let Some(batch) = accumulator.take() {
            self.inner.dispatcher.dispatch(batch).await;
        }
        Ok(())
    }

    /// Flush the remaining buffer and wait for every batch to settle.
    ///
    /// Returns `true` if everything settled within `timeout`. Batches still
    /// running when the timeout expires are not cancelled; their results still
    /// reach the listener. Calling `close` again, or from several tasks at
    /// once, waits on the first call and returns its result.
    pub async fn close(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        *self
            .inner
            .closed
            .get_or_init(|| self.shutdown(deadline))
            .await
    }

    /// Operations buffered and not yet cut into a batch.
    pub async fn pending_operations(&self) -> usize {
        self.inner.accumulator.lock().await.len()
    }

    /// Batches currently being sent or retried.
    pub fn in_flight(&self) -> usize {
        self.inner.dispatcher.in_flight()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    async fn shutdown(&self, deadline: Instant) -> bool {
        self.inner.closing.store(true, Ordering::SeqCst);
        info!("Closing bulk processor");

        // Runs to completion even if the wait below times out.
        let inner = self.inner.clone();
        let remainder = tokio::spawn(async move {
            let batch = inner.accumulator.lock().await.close();
            if let Some(batch) = batch {
                debug!(batch_id = batch.id(), operations = batch.len(), "Flushing remainder");
                inner.dispatcher.dispatch(batch).await;
            }
        });

        let drained = async {
            if remainder.await.is_err() {
                return false;
            }
            self.inner.dispatcher.await_idle().await
        };

        match time::timeout_at(deadline, drained).await {
            Ok(drained) => {
                let stats = self.stats();
                info!(
                    drained = drained,
                    batches = stats.batches_dispatched,
                    operations = stats.operations_submitted,
                    "Bulk processor closed"
                );
                drained
            }
            Err(_) => {
                warn!(
                    in_flight = self.in_flight(),
                    "Bulk processor close timed out with batches outstanding"
                );
                false
            }
        }
    }
}

impl Inner {
    fn is_closing(&self, accumulator: &Accumulator) -> bool {
        accumulator.is_closed() || self.closing.load(Ordering::SeqCst)
    }

    async fn submit(&self, operation: WriteOperation) -> Result<(), BulkError> {
        let mut accumulator = self.accumulator.lock().await;
        if self.is_closing(&accumulator) {
            return Err(BulkError::Closed);
        }

        let batch = accumulator.push(operation)?;
        self.stats.record_submitted();

        if let Some(batch) = batch {
            self.dispatcher.dispatch(batch).await;
        }
        Ok(())
    }

    async fn tick(&self) -> Result<(), BulkError> {
        let mut accumulator = self.accumulator.lock().await;
        if self.is_closing(&accumulator) {
            return Err(BulkError::Closed);
        }
        if let Some(batch) = accumulator.take_if_due(Instant::now()) {
            debug!(batch_id = batch.id(), operations = batch.len(), "Flush interval elapsed");
            self.dispatcher.dispatch(batch).await;
        }
        Ok(())
    }
}

/// Tick until the processor closes or is dropped.
async fn run_ticker(inner: Weak<Inner>, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        if inner.tick().await.is_err() {
            break;
        }
    }
    debug!("Flush timer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::RetryPolicy;
    use crate::testing::{ListenerEvent, MockReply, MockSink, RecordingListener};
    use bulk_indexer_repository::SinkError;
    use bulk_indexer_shared::OperationKind;
    use std::collections::HashMap;
    use std::sync::OnceLock;

    fn processor(
        sink: Arc<MockSink>,
        listener: Arc<RecordingListener>,
        config: BulkProcessorConfig,
    ) -> BulkProcessor {
        BulkProcessor::builder(sink)
            .listener(listener)
            .config(config)
            .build()
            .unwrap()
    }

    fn upsert(id: &str) -> WriteOperation {
        WriteOperation::upsert(id, "{\"title\":\"hello\"}")
    }

    fn count_config(max_operations: usize) -> BulkProcessorConfig {
        BulkProcessorConfig {
            max_operations: Some(max_operations),
            max_bytes: None,
            flush_interval: None,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_on_operation_count() {
        let sink = Arc::new(MockSink::new());
        let listener = Arc::new(RecordingListener::default());
        let processor = processor(sink.clone(), listener.clone(), count_config(3));

        processor.submit(upsert("1")).await.unwrap();
        processor.submit(upsert("2")).await.unwrap();
        assert_eq!(sink.call_count().await, 0);
        assert_eq!(processor.pending_operations().await, 2);

        processor.submit(WriteOperation::delete("3")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);

        assert_eq!(sink.sent_ids().await, vec![vec!["1", "2", "3"]]);
        assert_eq!(
            listener.events(),
            vec![ListenerEvent::Before(1, 3), ListenerEvent::Success(1, 3)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_on_byte_size() {
        let sink = Arc::new(MockSink::new());
        let listener = Arc::new(RecordingListener::default());
        let config = BulkProcessorConfig {
            max_operations: None,
            max_bytes: Some(40),
            ..Default::default()
        };
        let processor = processor(sink.clone(), listener.clone(), config);

        // 1 byte id + 17 byte payload each
        processor.submit(upsert("a")).await.unwrap();
        processor.submit(upsert("b")).await.unwrap();
        assert_eq!(sink.call_count().await, 0);

        processor.submit(upsert("c")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);

        assert_eq!(sink.sent_ids().await, vec![vec!["a", "b", "c"]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_on_interval() {
        let sink = Arc::new(MockSink::new());
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(100).with_flush_interval(Duration::from_secs(1));
        let processor = processor(sink.clone(), listener.clone(), config);

        processor.submit(upsert("1")).await.unwrap();
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sink.call_count().await, 0);

        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(sink.call_count().await, 1);
        assert_eq!(processor.pending_operations().await, 0);

        assert!(processor.close(Duration::from_secs(5)).await);
        assert_eq!(listener.successes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_tick_respects_interval() {
        let sink = Arc::new(MockSink::new());
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(100).with_flush_interval(Duration::from_secs(60));
        let processor = processor(sink.clone(), listener.clone(), config);

        processor.submit(upsert("1")).await.unwrap();
        processor.tick().await.unwrap();
        assert_eq!(processor.pending_operations().await, 1);

        processor.flush().await.unwrap();
        assert_eq!(processor.pending_operations().await, 0);
        assert!(processor.close(Duration::from_secs(5)).await);
        assert_eq!(sink.call_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_slot_serializes_batches() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(100)));
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(1).with_max_concurrent_batches(1);
        let processor = processor(sink.clone(), listener.clone(), config);

        processor.submit(upsert("a")).await.unwrap();
        // Returns once batch 1 has a slot, before it settles.
        assert_eq!(processor.in_flight(), 1);
        processor.submit(upsert("b")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);

        assert_eq!(
            sink.events().await,
            vec!["start:1", "end:1", "start:2", "end:2"]
        );
        assert_eq!(sink.max_active(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inline_mode_is_sequential() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(100)));
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(1).with_max_concurrent_batches(0);
        let processor = processor(sink.clone(), listener.clone(), config);

        processor.submit(upsert("a")).await.unwrap();
        // The batch has already settled.
        assert_eq!(processor.in_flight(), 0);
        assert_eq!(listener.successes(), 1);

        processor.submit(upsert("b")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);
        assert_eq!(sink.max_active(), 1);
        assert_eq!(listener.successes(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_batches_keep_creation_order() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(100)));
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(1).with_max_concurrent_batches(3);
        let processor = processor(sink.clone(), listener.clone(), config);

        for id in 1..=6 {
            processor.submit(upsert(&id.to_string())).await.unwrap();
        }
        assert!(processor.close(Duration::from_secs(5)).await);

        let starts: Vec<String> = sink
            .events()
            .await
            .into_iter()
            .filter(|e| e.starts_with("start"))
            .collect();
        assert_eq!(
            starts,
            vec!["start:1", "start:2", "start:3", "start:4", "start:5", "start:6"]
        );
        assert_eq!(sink.max_active(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_creation_order_holds_across_worker_threads() {
        let expected: Vec<String> = (1..=32).map(|id| id.to_string()).collect();

        for _ in 0..20 {
            let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(1)));
            let listener = Arc::new(RecordingListener::default());
            let config = count_config(1).with_max_concurrent_batches(8);
            let processor = processor(sink.clone(), listener.clone(), config);

            for id in &expected {
                processor.submit(WriteOperation::delete(id.as_str())).await.unwrap();
            }
            assert!(processor.close(Duration::from_secs(5)).await);

            let sent: Vec<String> = sink.sent_ids().await.into_iter().flatten().collect();
            assert_eq!(sent, expected);
            assert_eq!(listener.successes(), 32);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failures_retried_then_success() {
        let sink = Arc::new(MockSink::with_replies(vec![
            MockReply::Fail(SinkError::connection("refused")),
            MockReply::Fail(SinkError::connection("refused")),
            MockReply::Succeed,
        ]));
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(2).with_retry(RetryPolicy::exponential(
            Duration::from_millis(100),
            3,
            2.0,
        ));
        let processor = processor(sink.clone(), listener.clone(), config);

        processor.submit(upsert("a")).await.unwrap();
        processor.submit(upsert("b")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);

        assert_eq!(sink.call_count().await, 3);
        assert_eq!(listener.successes(), 1);
        assert_eq!(listener.terminal_failures(), 0);
        assert_eq!(processor.stats().retries, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_report_one_terminal_failure() {
        let sink = Arc::new(MockSink::with_replies(vec![
            MockReply::Fail(SinkError::timeout("request timed out"));
            5
        ]));
        let listener = Arc::new(RecordingListener::default());
        let config =
            count_config(1).with_retry(RetryPolicy::constant(Duration::from_millis(10), 2));
        let processor = processor(sink.clone(), listener.clone(), config);

        processor.submit(upsert("a")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);

        assert_eq!(sink.call_count().await, 3);
        assert_eq!(
            listener.events(),
            vec![
                ListenerEvent::Before(1, 1),
                ListenerEvent::Terminal(
                    1,
                    BulkError::TerminalFailure {
                        attempts: 3,
                        source: SinkError::timeout("request timed out"),
                    }
                ),
            ]
        );
        let stats = processor.stats();
        assert_eq!(stats.batches_failed, 1);
        assert_eq!(stats.operations_failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_failures_reported_once_per_operation() {
        let sink = Arc::new(MockSink::with_replies(vec![MockReply::RejectItems {
            positions: vec![1],
            retryable: false,
        }]));
        let listener = Arc::new(RecordingListener::default());
        let processor = processor(sink.clone(), listener.clone(), count_config(3));

        processor.submit(upsert("a")).await.unwrap();
        processor.submit(upsert("b")).await.unwrap();
        processor.submit(WriteOperation::delete("c")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);

        let events = listener.events();
        let outcomes = match &events[1] {
            ListenerEvent::Partial(1, outcomes) => outcomes.clone(),
            other => panic!("expected partial failure, got {:?}", other),
        };
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1].id, "b");
        assert_eq!(outcomes[2].kind, OperationKind::Delete);
        assert_eq!(
            crate::listener::item_result(&outcomes[1]),
            Err(BulkError::item_failure("b", "es_rejected_execution_exception"))
        );
        assert_eq!(sink.call_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_pressured_items_resent_when_enabled() {
        let sink = Arc::new(MockSink::with_replies(vec![MockReply::RejectItems {
            positions: vec![0],
            retryable: true,
        }]));
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(2).with_retry_rejected_items(true);
        let processor = processor(sink.clone(), listener.clone(), config);

        processor.submit(upsert("a")).await.unwrap();
        processor.submit(upsert("b")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);

        assert_eq!(sink.sent_ids().await, vec![vec!["a", "b"], vec!["a"]]);
        assert_eq!(listener.successes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_remainder_and_rejects_submit() {
        let sink = Arc::new(MockSink::new());
        let listener = Arc::new(RecordingListener::default());
        let processor = processor(sink.clone(), listener.clone(), count_config(10));

        processor.submit(upsert("a")).await.unwrap();
        assert!(processor.close(Duration::from_secs(5)).await);
        assert!(processor.close(Duration::from_secs(5)).await);

        assert_eq!(sink.call_count().await, 1);
        assert_eq!(processor.submit(upsert("b")).await, Err(BulkError::Closed));
        assert_eq!(processor.flush().await, Err(BulkError::Closed));
        assert_eq!(processor.tick().await, Err(BulkError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_close_calls_collapse() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(100)));
        let listener = Arc::new(RecordingListener::default());
        let processor = processor(sink.clone(), listener.clone(), count_config(10));

        processor.submit(upsert("a")).await.unwrap();
        let (first, second) = tokio::join!(
            processor.close(Duration::from_secs(5)),
            processor.close(Duration::from_secs(5))
        );

        assert!(first && second);
        assert_eq!(sink.call_count().await, 1);
        assert_eq!(listener.successes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_times_out_without_cancelling() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_secs(10)));
        let listener = Arc::new(RecordingListener::default());
        let processor = processor(sink.clone(), listener.clone(), count_config(10));

        processor.submit(upsert("a")).await.unwrap();
        assert!(!processor.close(Duration::from_secs(1)).await);
        assert_eq!(listener.successes(), 0);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(listener.successes(), 1);
        assert_eq!(processor.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_producers_lose_nothing() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(5)));
        let listener = Arc::new(RecordingListener::default());
        let config = count_config(7).with_max_concurrent_batches(2);
        let processor = processor(sink.clone(), listener.clone(), config);

        let producers = (0..4).map(|producer| {
            let processor = processor.clone();
            async move {
                for i in 0..25 {
                    processor
                        .submit(upsert(&format!("{}-{}", producer, i)))
                        .await
                        .unwrap();
                }
            }
        });
        futures::future::join_all(producers).await;
        assert!(processor.close(Duration::from_secs(30)).await);

        let mut seen: HashMap<String, usize> = HashMap::new();
        for id in sink.sent_ids().await.into_iter().flatten() {
            *seen.entry(id).or_default() += 1;
        }
        assert_eq!(seen.len(), 100);
        assert!(seen.values().all(|&count| count == 1));

        let stats = processor.stats();
        assert_eq!(stats.operations_submitted, 100);
        assert_eq!(stats.operations_succeeded, 100);
        assert_eq!(stats.batches_dispatched, 15);
    }

    struct ClosingListener {
        processor: OnceLock<BulkProcessor>,
        closed: Arc<tokio::sync::Notify>,
    }

    impl BulkListener for ClosingListener {
        fn after_success(&self, _batch: &crate::Batch, _outcomes: &[crate::ItemOutcome]) {
            if let Some(processor) = self.processor.get().cloned() {
                let closed = self.closed.clone();
                tokio::spawn(async move {
                    assert!(processor.close(Duration::from_secs(5)).await);
                    closed.notify_one();
                });
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_from_listener_callback() {
        let sink = Arc::new(MockSink::new().with_delay(Duration::from_millis(50)));
        let closed = Arc::new(tokio::sync::Notify::new());
        let listener = Arc::new(ClosingListener {
            processor: OnceLock::new(),
            closed: closed.clone(),
        });
        let processor = BulkProcessor::builder(sink.clone())
            .listener(listener.clone())
            .config(count_config(1))
            .build()
            .unwrap();
        let _ = listener.processor.set(processor.clone());

        processor.submit(upsert("a")).await.unwrap();

        time::timeout(Duration::from_secs(10), closed.notified())
            .await
            .expect("close from a callback completes");
        assert_eq!(processor.submit(upsert("b")).await, Err(BulkError::Closed));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let result = BulkProcessor::builder(Arc::new(MockSink::new()))
            .config(BulkProcessorConfig::default().with_max_bytes(0))
            .build();
        assert!(matches!(result, Err(BulkError::ConfigError(_))));
    }

    #[test]
    fn test_build_with_interval_needs_runtime() {
        let result = BulkProcessor::builder(Arc::new(MockSink::new()))
            .config(BulkProcessorConfig::default().with_flush_interval(Duration::from_secs(1)))
            .build();
        assert!(matches!(result, Err(BulkError::ConfigError(_))));
    }
}

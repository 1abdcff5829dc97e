//! Dependency initialization and wiring for the bulk indexer.

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::IndexingError;
use bulk_indexer_pipeline::{BulkProcessor, BulkProcessorConfig, TracingListener};
use bulk_indexer_repository::config::{DEFAULT_INDEX, DEFAULT_OPENSEARCH_URL};
use bulk_indexer_repository::{OpenSearchSink, SinkConfig, WriteSink};

/// Default time `close` waits for outstanding batches.
const DEFAULT_CLOSE_TIMEOUT_SECS: u64 = 30;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured processor, ready to accept operations.
    pub processor: BulkProcessor,
    /// How long to wait for outstanding batches on shutdown.
    pub close_timeout: Duration,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `BULK_INDEX`: Target index (default: posts)
    /// - `BULK_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: client default)
    /// - `BULK_CLOSE_TIMEOUT_SECS`: Shutdown wait (default: 30)
    /// - `BULK_SKIP_HEALTH_CHECK`: Skip the startup ping when set
    /// - `BULK_*`: Processor options, see [`BulkProcessorConfig::from_env`]
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails
    pub async fn new() -> Result<Self, IndexingError> {
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let index = env::var("BULK_INDEX").unwrap_or_else(|_| DEFAULT_INDEX.to_string());

        let mut sink_config = SinkConfig::new(&opensearch_url, &index);
        if let Some(secs) = env_secs("BULK_REQUEST_TIMEOUT_SECS")? {
            sink_config = sink_config.with_timeout(Duration::from_secs(secs));
        }
        let close_timeout = Duration::from_secs(
            env_secs("BULK_CLOSE_TIMEOUT_SECS")?.unwrap_or(DEFAULT_CLOSE_TIMEOUT_SECS),
        );

        let processor_config = BulkProcessorConfig::from_env()
            .map_err(|e| IndexingError::config(format!("Invalid processor options: {}", e)))?;

        info!(
            opensearch_url = %opensearch_url,
            index = %index,
            close_timeout_secs = close_timeout.as_secs(),
            "Initializing dependencies"
        );

        // Initialize OpenSearch sink
        let sink = OpenSearchSink::new(sink_config)
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch sink: {}", e)))?;

        // Verify OpenSearch is reachable
        if env::var("BULK_SKIP_HEALTH_CHECK").is_ok() {
            info!("Skipping OpenSearch health check");
        } else {
            let healthy = sink.health_check().await.map_err(|e| {
                IndexingError::config(format!("OpenSearch health check failed: {}", e))
            })?;

            if !healthy {
                return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
            }

            info!("OpenSearch connection verified");
        }

        let processor = BulkProcessor::builder(Arc::new(sink))
            .listener(Arc::new(TracingListener))
            .config(processor_config)
            .build()?;

        Ok(Self {
            processor,
            close_timeout,
        })
    }
}

fn env_secs(key: &str) -> Result<Option<u64>, IndexingError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| IndexingError::config(format!("{} has an invalid value: {:?}", key, value))),
        Err(_) => Ok(None),
    }
}

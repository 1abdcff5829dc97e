//! OpenSearch sink implementation.
//!
//! This module provides the concrete implementation of `WriteSink` on top of
//! the OpenSearch `_bulk` API.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::SinkConfig;
use crate::errors::SinkError;
use crate::interfaces::{SinkResponse, WriteSink};
use crate::opensearch::bulk::{build_bulk_body, parse_bulk_response};
use bulk_indexer_shared::Batch;

/// Write sink backed by an OpenSearch index.
///
/// # Example
///
/// ```ignore
/// use bulk_indexer_repository::{OpenSearchSink, SinkConfig, WriteSink};
/// let sink = OpenSearchSink::new(SinkConfig::new("http://localhost:9200", "posts"))?;
/// let response = sink.write_batch(&batch).await?;
/// ```
pub struct OpenSearchSink {
    client: OpenSearch,
    index: String,
}

impl OpenSearchSink {
    /// Create a new sink connected to the configured URL.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchSink)` - A new sink instance
    /// * `Err(SinkError)` - If the URL is invalid or transport setup fails
    pub fn new(config: SinkConfig) -> Result<Self, SinkError> {
        let parsed_url = Url::parse(&config.url).map_err(|e| SinkError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let transport = builder
            .build()
            .map_err(|e| SinkError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            index = %config.index,
            "Created OpenSearch sink"
        );

        Ok(Self {
            client,
            index: config.index,
        })
    }
}

fn send_error(e: opensearch::Error) -> SinkError {
    if e.is_timeout() {
        SinkError::timeout(e.to_string())
    } else {
        SinkError::connection(e.to_string())
    }
}

#[async_trait]
impl WriteSink for OpenSearchSink {
    /// Send the batch as one `_bulk` request and decode per-item results.
    ///
    /// Operations whose payload is not a JSON object are reported as failed
    /// items without being sent. If none of the operations can be encoded, no
    /// request is made at all.
    #[instrument(skip(self, batch), fields(batch_id = batch.id(), operations = batch.len()))]
    async fn write_batch(&self, batch: &Batch) -> Result<SinkResponse, SinkError> {
        let mut body = build_bulk_body(batch);

        if let Some(outcomes) = body.take_unsent_outcomes() {
            warn!("No operation in batch could be encoded, skipping request");
            return Ok(SinkResponse::from_outcomes(outcomes));
        }

        let lines: Vec<JsonBody<Value>> = std::mem::take(&mut body.lines)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index))
            .body(lines)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SinkError::from_status(status.as_u16(), error_body));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SinkError::malformed(e.to_string()))?;

        let took_ms = response_body
            .get("took")
            .and_then(|took| took.as_u64())
            .unwrap_or(0);
        let outcomes = parse_bulk_response(batch, body, &response_body)?;
        let response = SinkResponse::from_outcomes(outcomes);

        debug!(
            took_ms = took_ms,
            has_failures = response.has_failures(),
            "Bulk request completed"
        );

        Ok(response)
    }

    /// Check if the cluster answers a ping.
    async fn health_check(&self) -> Result<bool, SinkError> {
        let response = self.client.ping().send().await.map_err(send_error)?;
        Ok(response.status_code().is_success())
    }
}

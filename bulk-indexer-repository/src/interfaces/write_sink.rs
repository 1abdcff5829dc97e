//! Write sink trait definition.
//!
//! This module defines the abstract interface the bulk processor delivers
//! batches to, allowing different backends (OpenSearch, mocks in tests).

use async_trait::async_trait;

use crate::errors::SinkError;
use bulk_indexer_shared::{Batch, ItemOutcome};

/// A batch-level answer from the sink. Both variants carry one outcome per
/// operation, in batch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkResponse {
    /// Every operation was applied.
    AllSucceeded(Vec<ItemOutcome>),
    /// The request went through but at least one operation was rejected.
    PartialFailure(Vec<ItemOutcome>),
}

impl SinkResponse {
    /// Classify a list of outcomes.
    pub fn from_outcomes(outcomes: Vec<ItemOutcome>) -> Self {
        if outcomes.iter().all(ItemOutcome::is_success) {
            Self::AllSucceeded(outcomes)
        } else {
            Self::PartialFailure(outcomes)
        }
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        match self {
            Self::AllSucceeded(outcomes) | Self::PartialFailure(outcomes) => outcomes,
        }
    }

    pub fn into_outcomes(self) -> Vec<ItemOutcome> {
        match self {
            Self::AllSucceeded(outcomes) | Self::PartialFailure(outcomes) => outcomes,
        }
    }

    pub fn has_failures(&self) -> bool {
        matches!(self, Self::PartialFailure(_))
    }
}

/// Abstract interface for the bulk write endpoint.
///
/// Implementations are called from spawned tasks and must be `Send + Sync`.
/// A call resolves exactly once: with a [`SinkResponse`] when the request was
/// delivered and answered, or with a [`SinkError`] when the batch as a whole
/// was not applied (or its fate is unknown).
#[async_trait]
pub trait WriteSink: Send + Sync {
    /// Apply every operation of `batch`.
    ///
    /// # Returns
    ///
    /// * `Ok(SinkResponse)` - One outcome per operation, in batch order
    /// * `Err(SinkError)` - If the batch could not be delivered
    async fn write_batch(&self, batch: &Batch) -> Result<SinkResponse, SinkError>;

    /// Check if the sink is reachable.
    async fn health_check(&self) -> Result<bool, SinkError> {
        Ok(true)
    }
}

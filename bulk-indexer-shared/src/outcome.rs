//! Per-item results reported by a write sink.

use crate::operation::{OperationKind, WriteOperation};

/// Whether a single operation within a batch was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Succeeded,
    /// The service rejected the operation. `retryable` is set only when the
    /// rejection was caused by back-pressure, not by the document itself.
    Failed { reason: String, retryable: bool },
}

/// Result of one operation within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Position of the operation in its batch.
    pub position: usize,
    pub id: String,
    pub kind: OperationKind,
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn succeeded(position: usize, operation: &WriteOperation) -> Self {
        Self {
            position,
            id: operation.id().to_string(),
            kind: operation.kind(),
            status: ItemStatus::Succeeded,
        }
    }

    pub fn failed(
        position: usize,
        operation: &WriteOperation,
        reason: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            position,
            id: operation.id().to_string(),
            kind: operation.kind(),
            status: ItemStatus::Failed {
                reason: reason.into(),
                retryable,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ItemStatus::Succeeded)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.status, ItemStatus::Failed { retryable: true, .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            ItemStatus::Succeeded => None,
            ItemStatus::Failed { reason, .. } => Some(reason),
        }
    }
}

//! The unit of delivery to a write sink.

use chrono::{DateTime, Utc};

use crate::operation::WriteOperation;

/// An ordered group of write operations sent to the sink in one call.
///
/// Batch ids are assigned by the processor that cut the batch and increase
/// monotonically, starting at 1.
#[derive(Debug, Clone)]
pub struct Batch {
    id: u64,
    operations: Vec<WriteOperation>,
    size_in_bytes: usize,
    created_at: DateTime<Utc>,
}

impl Batch {
    pub fn new(id: u64, operations: Vec<WriteOperation>) -> Self {
        let size_in_bytes = operations.iter().map(WriteOperation::estimated_size).sum();
        Self {
            id,
            operations,
            size_in_bytes,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn operations(&self) -> &[WriteOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Sum of [`WriteOperation::estimated_size`] over all operations.
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

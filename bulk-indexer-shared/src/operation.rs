//! Write operation types.

use std::fmt;

/// The kind of a write operation, as named by the bulk API action line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Index,
    Upsert,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Index => "index",
            OperationKind::Upsert => "upsert",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single write against the search index.
///
/// Operations are immutable once created. The processor owns an operation from
/// the moment it is submitted until it is cut into a [`Batch`](crate::Batch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOperation {
    /// Replace the whole document with `payload`.
    Index { id: String, payload: Vec<u8> },
    /// Merge `payload` into the document, creating it if it does not exist.
    Upsert { id: String, payload: Vec<u8> },
    /// Remove the document.
    Delete { id: String },
}

impl WriteOperation {
    /// Create a full-document index operation.
    pub fn index(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self::Index {
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// Create an upsert operation.
    pub fn upsert(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self::Upsert {
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// Create a delete operation.
    pub fn delete(id: impl Into<String>) -> Self {
        Self::Delete { id: id.into() }
    }

    /// The target document id.
    pub fn id(&self) -> &str {
        match self {
            Self::Index { id, .. } | Self::Upsert { id, .. } | Self::Delete { id } => id,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Index { .. } => OperationKind::Index,
            Self::Upsert { .. } => OperationKind::Upsert,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }

    /// The document body, if the operation carries one.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Index { payload, .. } | Self::Upsert { payload, .. } => Some(payload),
            Self::Delete { .. } => None,
        }
    }

    /// Size counted against the byte flush threshold: id plus payload.
    pub fn estimated_size(&self) -> usize {
        self.id().len() + self.payload().map_or(0, <[u8]>::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_size() {
        let upsert = WriteOperation::upsert("doc-1", br#"{"title":"a"}"#.to_vec());
        assert_eq!(upsert.estimated_size(), 5 + 13);

        let delete = WriteOperation::delete("doc-1");
        assert_eq!(delete.estimated_size(), 5);
        assert!(delete.payload().is_none());
    }

    #[test]
    fn test_kind_and_id() {
        let op = WriteOperation::index("42", "{}");
        assert_eq!(op.kind(), OperationKind::Index);
        assert_eq!(op.id(), "42");
        assert_eq!(op.kind().to_string(), "index");
    }
}

//! NDJSON input lines.
//!
//! Each line holds one operation:
//!
//! ```text
//! {"op":"index","id":"1","doc":{"title":"hello"}}
//! {"op":"upsert","id":"1","doc":{"views":3}}
//! {"op":"delete","id":"1"}
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::io;
use std::pin::pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::IndexingError;
use bulk_indexer_pipeline::BulkProcessor;
use bulk_indexer_shared::WriteOperation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum LineOp {
    Index,
    Upsert,
    Delete,
}

#[derive(Debug, Deserialize)]
struct InputLine {
    op: LineOp,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    doc: Option<Value>,
}

/// Parse one input line.
///
/// Index and upsert lines without an id get a random UUID.
///
/// # Returns
///
/// * `Ok(Some(WriteOperation))` - The operation on this line
/// * `Ok(None)` - The line is blank
/// * `Err(IndexingError::InvalidInput)` - The line is not a valid operation
pub fn parse_line(line: &str) -> Result<Option<WriteOperation>, IndexingError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parsed: InputLine =
        serde_json::from_str(line).map_err(|e| IndexingError::invalid_input(e.to_string()))?;

    let operation = match parsed.op {
        LineOp::Delete => {
            let id = parsed
                .id
                .ok_or_else(|| IndexingError::invalid_input("delete requires an id"))?;
            WriteOperation::delete(id)
        }
        LineOp::Index | LineOp::Upsert => {
            let doc = match parsed.doc {
                Some(doc @ Value::Object(_)) => doc,
                Some(_) => return Err(IndexingError::invalid_input("doc must be a JSON object")),
                None => return Err(IndexingError::invalid_input("doc is required")),
            };
            let payload =
                serde_json::to_vec(&doc).map_err(|e| IndexingError::invalid_input(e.to_string()))?;
            let id = parsed.id.unwrap_or_else(|| Uuid::new_v4().to_string());

            if matches!(parsed.op, LineOp::Index) {
                WriteOperation::index(id, payload)
            } else {
                WriteOperation::upsert(id, payload)
            }
        }
    };

    Ok(Some(operation))
}

/// What a [`feed`] run read from its input.
#[derive(Debug, Default)]
pub struct FeedSummary {
    /// Lines read, including blank and skipped ones.
    pub lines: usize,
    /// Lines that did not hold a valid operation.
    pub skipped: usize,
    /// Set when the input could not be read to its end.
    pub read_error: Option<io::Error>,
}

/// Submit each operation read from `reader` to `processor`.
///
/// Stops at end of input, when `shutdown` resolves, when a line cannot be
/// read, or when the processor refuses an operation. Invalid lines are logged
/// and skipped. A read error is returned in the summary rather than raised,
/// and the processor is left open with whatever it has buffered.
pub async fn feed<R, S>(reader: R, processor: &BulkProcessor, shutdown: S) -> FeedSummary
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = reader.lines();
    let mut shutdown = pin!(shutdown);
    let mut summary = FeedSummary::default();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("Reached end of input");
                        break;
                    }
                    Err(e) => {
                        error!(line = summary.lines + 1, error = %e, "Failed to read input");
                        summary.read_error = Some(e);
                        break;
                    }
                };
                summary.lines += 1;

                match parse_line(&line) {
                    Ok(Some(operation)) => {
                        if let Err(e) = processor.submit(operation).await {
                            error!(line = summary.lines, error = %e, "Failed to submit operation");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        summary.skipped += 1;
                        warn!(line = summary.lines, error = %e, "Skipping invalid input line");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    summary
}

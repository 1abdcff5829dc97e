//! Bulk request encoding and response decoding.
//!
//! The `_bulk` endpoint takes newline-delimited action/document pairs and
//! answers with one item per action, in request order. Operations whose payload
//! is not valid JSON are rejected here and never sent, so the set of positions
//! actually sent is tracked alongside the body.

use serde_json::{json, Map, Value};

use crate::errors::SinkError;
use bulk_indexer_shared::{Batch, ItemOutcome, WriteOperation};

/// Status the service uses for back-pressure rejections of a single item.
const TOO_MANY_REQUESTS: u64 = 429;
const NOT_FOUND: u64 = 404;

/// An encoded bulk request for one batch.
#[derive(Debug, Default)]
pub(crate) struct BulkBody {
    /// Action and document lines, in order.
    pub lines: Vec<Value>,
    /// Batch positions of the operations encoded in `lines`.
    pub sent: Vec<usize>,
    /// Operations that could not be encoded.
    pub rejected: Vec<ItemOutcome>,
}

impl BulkBody {
    /// Outcomes for a batch that has nothing left to send.
    ///
    /// When no operation could be encoded the rejections are the whole answer,
    /// ordered by position. Returns `None` if a request has to be made.
    pub(crate) fn take_unsent_outcomes(&mut self) -> Option<Vec<ItemOutcome>> {
        if !self.sent.is_empty() {
            return None;
        }
        let mut outcomes = std::mem::take(&mut self.rejected);
        outcomes.sort_by_key(|outcome| outcome.position);
        Some(outcomes)
    }
}

/// Encode `batch` as bulk request lines.
pub(crate) fn build_bulk_body(batch: &Batch) -> BulkBody {
    let mut body = BulkBody {
        lines: Vec::with_capacity(batch.len() * 2),
        ..Default::default()
    };

    for (position, operation) in batch.operations().iter().enumerate() {
        match encode_operation(operation) {
            Ok(lines) => {
                body.lines.extend(lines);
                body.sent.push(position);
            }
            Err(reason) => {
                body.rejected
                    .push(ItemOutcome::failed(position, operation, reason, false));
            }
        }
    }

    body
}

fn action_line(action: &str, id: &str) -> Value {
    let mut meta = Map::new();
    if !id.is_empty() {
        meta.insert("_id".to_string(), json!(id));
    }
    json!({ action: meta })
}

fn parse_payload(payload: &[u8]) -> Result<Value, String> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|e| format!("Invalid JSON payload: {}", e))?;
    if !value.is_object() {
        return Err("Payload must be a JSON object".to_string());
    }
    Ok(value)
}

fn encode_operation(operation: &WriteOperation) -> Result<Vec<Value>, String> {
    match operation {
        WriteOperation::Index { id, payload } => {
            let doc = parse_payload(payload)?;
            Ok(vec![action_line("index", id), doc])
        }
        WriteOperation::Upsert { id, payload } => {
            let doc = parse_payload(payload)?;
            // API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/#using-the-upsert-operation
            Ok(vec![
                action_line("update", id),
                json!({ "doc": doc, "doc_as_upsert": true }),
            ])
        }
        WriteOperation::Delete { id } => Ok(vec![action_line("delete", id)]),
    }
}

/// Decode a bulk response into one outcome per batch operation.
///
/// `body` is the encoded request the response answers. Its rejected outcomes
/// are merged back in so the result covers the whole batch, in batch order.
pub(crate) fn parse_bulk_response(
    batch: &Batch,
    body: BulkBody,
    response: &Value,
) -> Result<Vec<ItemOutcome>, SinkError> {
    let items = response
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SinkError::malformed("Bulk response has no items array"))?;

    if items.len() != body.sent.len() {
        return Err(SinkError::malformed(format!(
            "Bulk response has {} items for {} operations",
            items.len(),
            body.sent.len()
        )));
    }

    let mut outcomes: Vec<Option<ItemOutcome>> = vec![None; batch.len()];

    for rejected in body.rejected {
        let position = rejected.position;
        outcomes[position] = Some(rejected);
    }

    for (item, &position) in items.iter().zip(&body.sent) {
        let operation = &batch.operations()[position];
        outcomes[position] = Some(parse_item(position, operation, item)?);
    }

    outcomes
        .into_iter()
        .enumerate()
        .map(|(position, outcome)| {
            outcome.ok_or_else(|| {
                SinkError::malformed(format!("No outcome for operation at position {}", position))
            })
        })
        .collect()
}

fn parse_item(
    position: usize,
    operation: &WriteOperation,
    item: &Value,
) -> Result<ItemOutcome, SinkError> {
    // Each item is keyed by its action: {"update": {"_id": .., "status": ..}}
    let result = item
        .as_object()
        .and_then(|object| object.values().next())
        .ok_or_else(|| SinkError::malformed(format!("Bulk item {} is not an object", position)))?;

    let status = result.get("status").and_then(Value::as_u64).unwrap_or(0);

    if let Some(error) = result.get("error") {
        let error_type = error
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error");
        let reason = match error.get("reason").and_then(Value::as_str) {
            Some(reason) => format!("{}: {}", error_type, reason),
            None => error_type.to_string(),
        };
        return Ok(ItemOutcome::failed(
            position,
            operation,
            reason,
            status == TOO_MANY_REQUESTS,
        ));
    }

    // Deleting a document that does not exist is not a failure.
    if (200..300).contains(&status) || status == NOT_FOUND {
        Ok(ItemOutcome::succeeded(position, operation))
    } else {
        Ok(ItemOutcome::failed(
            position,
            operation,
            format!("Unexpected item status {}", status),
            status == TOO_MANY_REQUESTS,
        ))
    }
}

mod parser;

use crate::analytics::domain::json_kind;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum BatchIngestError {
    #[error("failed to read order export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid order CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid order JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("order batch is empty")]
    EmptyBatch,
    #[error("expected an order list, got {found}")]
    UnsupportedPayload { found: &'static str },
}

/// Extract the order list from any accepted request envelope: a top-level
/// array, `{"orders": [...]}`, `{"data": [...]}`, or a single record object
/// wrapped as a one-element batch. An empty batch is a caller error.
pub fn orders_from_payload(payload: Value) -> Result<Vec<Value>, BatchIngestError> {
    let records = extract_records(payload)?;
    if records.is_empty() {
        return Err(BatchIngestError::EmptyBatch);
    }

    Ok(records)
}

fn extract_records(payload: Value) -> Result<Vec<Value>, BatchIngestError> {
    let mut envelope = match payload {
        Value::Array(records) => return Ok(records),
        Value::Object(envelope) => envelope,
        other => {
            return Err(BatchIngestError::UnsupportedPayload {
                found: json_kind(&other),
            })
        }
    };

    for key in ["orders", "data"] {
        if !matches!(envelope.get(key), Some(Value::Array(_))) {
            continue;
        }
        if let Some(Value::Array(records)) = envelope.remove(key) {
            return Ok(records);
        }
    }

    // a bare record object counts as a one-element batch
    Ok(vec![Value::Object(envelope)])
}

/// Load a batch from a CSV order export. Rows become the same loose record
/// representation the JSON path uses, so normalization policy is identical.
pub fn orders_from_csv_reader<R: Read>(reader: R) -> Result<Vec<Value>, BatchIngestError> {
    let records = parser::parse_orders(reader)?;
    if records.is_empty() {
        return Err(BatchIngestError::EmptyBatch);
    }

    Ok(records)
}

/// Load a batch from disk, picking the format by file extension (`.csv` or
/// JSON otherwise).
pub fn orders_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Value>, BatchIngestError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    if is_csv {
        let file = std::fs::File::open(path)?;
        orders_from_csv_reader(file)
    } else {
        let raw = std::fs::read_to_string(path)?;
        let payload: Value = serde_json::from_str(&raw)?;
        orders_from_payload(payload)
    }
}

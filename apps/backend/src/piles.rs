//! Request-side pile handling: accept both wire shapes and reindex onto the
//! six canonical piles the judge sees.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Player A owns 1-3, Player B owns 4-6.
pub const CANONICAL_PILE_IDS: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PileEntry {
    #[serde(rename = "pileId")]
    pub pile_id: String,
    pub items: Vec<String>,
}

/// Pull `piles` out of a request body and normalize it.
pub fn extract_piles(body: &Value) -> Result<Vec<PileEntry>, AppError> {
    let raw = body.get("piles").unwrap_or(&Value::Null);
    if is_missing(raw) {
        return Err(AppError::bad_request(
            ErrorCode::MissingPiles,
            "Missing 'piles' in request body",
        ));
    }
    normalize_piles(raw)
        .ok_or_else(|| AppError::bad_request(ErrorCode::InvalidPiles, "Invalid 'piles' format"))
}

// null, false, 0 and "" count as absent.
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Accepts `{"1": [...], ...}` or `[{"pileId": "1", "items": [...]}, ...]`.
/// Returns `None` for any other shape.
pub fn normalize_piles(piles: &Value) -> Option<Vec<PileEntry>> {
    match piles {
        Value::Array(entries) => Some(
            entries
                .iter()
                .map(|entry| PileEntry {
                    pile_id: entry.get("pileId").map(id_string).unwrap_or_default(),
                    items: item_strings(entry.get("items")),
                })
                .collect(),
        ),
        Value::Object(map) => Some(
            map.iter()
                .map(|(id, items)| PileEntry {
                    pile_id: id.clone(),
                    items: item_strings(Some(items)),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Exactly the six canonical piles, in order. Unknown ids are dropped,
/// absent ones are empty, and a repeated id keeps its last occurrence.
pub fn canonical_piles(entries: &[PileEntry]) -> Vec<PileEntry> {
    let by_id: HashMap<&str, &[String]> = entries
        .iter()
        .map(|entry| (entry.pile_id.as_str(), entry.items.as_slice()))
        .collect();

    CANONICAL_PILE_IDS
        .iter()
        .map(|id| PileEntry {
            pile_id: id.to_string(),
            items: by_id.get(id).map(|items| items.to_vec()).unwrap_or_default(),
        })
        .collect()
}

fn id_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        _ => value_string(value),
    }
}

fn item_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(value_string).collect(),
        _ => Vec::new(),
    }
}

fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

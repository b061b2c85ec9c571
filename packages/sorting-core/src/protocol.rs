//! Wire types for `POST /grade` and `GET /health`, plus the normalization
//! rules shared by the grading client and the scoring service.

use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::domain::PileStore;

/// `{"piles": {"1": [...], ..., "<pile_count>": [...]}}`.
///
/// Keys are emitted in numeric order, one per pile, including empty ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRequest {
    piles: Vec<(String, Vec<String>)>,
}

impl GradeRequest {
    pub fn pile_count(&self) -> usize {
        self.piles.len()
    }

    /// Names for a pile id such as `"3"`.
    pub fn pile(&self, id: &str) -> Option<&[String]> {
        self.piles
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, names)| names.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.piles
            .iter()
            .map(|(key, names)| (key.as_str(), names.as_slice()))
    }
}

struct PilesMap<'a>(&'a [(String, Vec<String>)]);

impl Serialize for PilesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, names) in self.0 {
            map.serialize_entry(key, names)?;
        }
        map.end()
    }
}

impl Serialize for GradeRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GradeRequest", 1)?;
        state.serialize_field("piles", &PilesMap(&self.piles))?;
        state.end()
    }
}

/// Serialize a finished store: trimmed display names, blanks dropped,
/// assignment order kept.
pub fn build_request(store: &PileStore) -> GradeRequest {
    let piles = store
        .iter()
        .map(|(id, items)| {
            let names = items
                .iter()
                .map(|item| item.display_name().trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            (id.to_string(), names)
        })
        .collect();
    GradeRequest { piles }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Tie,
}

impl Winner {
    pub fn as_str(self) -> &'static str {
        match self {
            Winner::A => "A",
            Winner::B => "B",
            Winner::Tie => "Tie",
        }
    }

    /// Any JSON value; only the strings `a`/`b` (any case, padded) name a player.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => normalize_winner(s),
            _ => Winner::Tie,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalize_winner(raw: &str) -> Winner {
    match raw.trim().to_uppercase().as_str() {
        "A" => Winner::A,
        "B" => Winner::B,
        _ => Winner::Tie,
    }
}

/// Clamp into `[0, 100]`; NaN and infinities become 0.
pub fn normalize_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn score_from_value(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    normalize_score(raw)
}

fn reason_from_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A judged round. Always within contract once built by this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    pub winner: Winner,
    #[serde(rename = "scoreA")]
    pub score_a: f64,
    #[serde(rename = "scoreB")]
    pub score_b: f64,
    #[serde(default)]
    pub reason: String,
}

impl GradeResult {
    /// Lenient read of a judged JSON object: any field may be missing or of
    /// the wrong type and is coerced into range. Errors only when `value` is
    /// not an object.
    pub fn from_json_value(value: &Value) -> Result<Self, String> {
        let Value::Object(fields) = value else {
            return Err(format!("expected a JSON object, got {}", json_type(value)));
        };
        let field = |name: &str| fields.get(name).unwrap_or(&Value::Null);

        Ok(Self {
            winner: Winner::from_value(field("winner")),
            score_a: score_from_value(field("scoreA")),
            score_b: score_from_value(field("scoreB")),
            reason: reason_from_value(field("reason")),
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(default)]
    pub version: String,
}

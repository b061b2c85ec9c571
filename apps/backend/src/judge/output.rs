//! Turning the judge's free text into a [`GradeResult`].

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use sorting_core::GradeResult;
use tracing::warn;

use crate::error::AppError;

fn json_fence() -> &'static Regex {
    static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(?i)```json\s*").unwrap()
    });
    &JSON_FENCE
}

/// Strip ```` ```json ```` and bare ```` ``` ```` fences, then trim.
pub fn strip_fences(text: &str) -> String {
    json_fence()
        .replace_all(text, "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse and normalize a verdict. Anything that is not a JSON object after
/// fence stripping is rejected with the untouched text as `raw`.
pub fn parse_judgment(text: &str) -> Result<GradeResult, AppError> {
    let cleaned = strip_fences(text);
    let reject = |detail: String| {
        warn!(raw = %text, %detail, "judge output is not valid JSON");
        AppError::JudgeOutput {
            detail: "Model did not return valid JSON".to_string(),
            raw: text.to_string(),
        }
    };

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| reject(e.to_string()))?;
    GradeResult::from_json_value(&value).map_err(reject)
}

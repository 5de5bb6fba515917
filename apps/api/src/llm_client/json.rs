//! JSON extraction from free-form model output.
//!
//! Models wrap JSON in prose, markdown fences or reasoning preambles. The object is taken
//! to span from the first `{` to the last `}`. When there is no such span the whole trimmed
//! reply is parsed instead. Any failure is total: no partial objects, no defaults.

use serde::de::DeserializeOwned;

use crate::llm_client::LlmError;

/// Parses the JSON object embedded in `raw` into `T`.
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    serde_json::from_str(json_span(raw)).map_err(|e| LlmError::MalformedResponse(e.to_string()))
}

/// Returns the slice between the first `{` and the last `}` inclusive,
/// or the trimmed input when no such span exists.
pub fn json_span(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => raw.trim(),
    }
}

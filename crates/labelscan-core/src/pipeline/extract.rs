//! Pulling the JSON object out of a free-form model reply.
//!
//! The reply is sliced from its first `{` to its last `}` inclusive and the
//! slice is parsed as one JSON document. The scan does not balance braces:
//! `{"a":1} noise {"b":2}` yields a single slice that fails to parse.

use serde_json::Value;

use crate::error::PipelineError;

/// Byte span of the first `{` through the last `}`, if both exist in that order.
pub fn brace_span(raw: &str) -> Option<(usize, usize)> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start <= end).then_some((start, end))
}

/// Parse the record embedded in a raw reply.
///
/// Fails with [`PipelineError::ResponseFormat`] when no brace span exists or
/// the span is not valid JSON.
pub fn extract_record(raw: &str) -> Result<Value, PipelineError> {
    let (start, end) = brace_span(raw).ok_or_else(|| PipelineError::ResponseFormat {
        message: "reply contains no `{ ... }` span".to_string(),
    })?;

    serde_json::from_str(&raw[start..=end]).map_err(|e| PipelineError::ResponseFormat {
        message: e.to_string(),
    })
}

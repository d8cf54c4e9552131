//! Result types produced by the extraction pipeline.

use std::time::Duration;

use crate::error::PipelineError;
use crate::schema::SchemaTemplate;

/// An extracted product record.
///
/// Whatever JSON object the model produced; its fields are not checked
/// against [`SchemaTemplate`]. On fallback it is the template itself.
pub type ProductRecord = serde_json::Value;

/// Outcome of one extraction run.
#[derive(Debug)]
pub struct Extraction {
    /// The parsed record, or the template on fallback
    pub record: ProductRecord,
    /// Why the template was substituted, if it was
    pub fallback: Option<PipelineError>,
    /// Wall-clock duration of the API call, when it succeeded
    pub latency: Option<Duration>,
    /// Model reported by the API, when the call succeeded
    pub model: Option<String>,
    /// Total tokens reported by the API, if any
    pub tokens_used: Option<u32>,
}

impl Extraction {
    /// Template fallback caused by `reason`.
    pub(crate) fn fallback(template: &SchemaTemplate, reason: PipelineError) -> Self {
        Self {
            record: template.to_value(),
            fallback: Some(reason),
            latency: None,
            model: None,
            tokens_used: None,
        }
    }

    /// Whether the record is the template rather than model output.
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Consume and return just the record.
    pub fn into_record(self) -> ProductRecord {
        self.record
    }
}

//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible gateway.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-small-3.2-24b-instruct:free";

/// LLM endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// File holding the base64-encoded API key (supports `~`)
    pub credential_file: String,

    /// Per-request timeout in milliseconds; unset means wait indefinitely
    pub timeout_ms: Option<u64>,

    /// Sampling temperature; unset leaves the API default
    pub temperature: Option<f32>,

    /// Completion token cap; unset leaves the API default
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            credential_file: "key.txt".to_string(),
            timeout_ms: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

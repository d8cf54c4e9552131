//! OpenAI-compatible chat-completions provider.
//!
//! Works against any endpoint speaking the OpenAI Chat Completions format
//! (OpenRouter by default). Images travel as data URLs in the user message
//! content array, after the instruction text.

use super::provider::{ContentPart, LlmProvider, LlmRequest, LlmResponse};
use crate::config::LlmConfig;
use crate::credentials::ApiKey;
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiProvider {
    api_key: ApiKey,
    model: String,
    endpoint: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider for `base_url` (e.g. `https://openrouter.ai/api/v1`).
    ///
    /// No request timeout is set; a silent endpoint blocks the call until the
    /// connection drops.
    pub fn new(base_url: &str, api_key: ApiKey, model: &str) -> Self {
        Self {
            api_key,
            model: model.to_string(),
            endpoint: chat_endpoint(base_url),
            temperature: None,
            max_tokens: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider from the `[llm]` config section.
    pub fn from_config(config: &LlmConfig, api_key: ApiKey) -> Self {
        let mut provider = Self::new(&config.base_url, api_key, &config.model);
        provider.temperature = config.temperature;
        provider.max_tokens = config.max_tokens;
        if let Some(ms) = config.timeout_ms {
            provider = provider.with_timeout(Duration::from_millis(ms));
        }
        provider
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout, using default: {e}");
                reqwest::Client::new()
            });
        self
    }

    /// Full chat-completions URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_body(&self, request: &LlmRequest) -> ChatRequest {
        let content = request
            .message
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => ChatContent::Text { text: text.clone() },
                ContentPart::Image(url) => ChatContent::ImageUrl {
                    image_url: ImageUrl { url: url.clone() },
                },
            })
            .collect();

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            max_tokens: request.max_tokens.or(self.max_tokens),
            temperature: request.temperature.or(self.temperature),
        }
    }
}

/// Join a base URL and the chat-completions path, tolerating a trailing `/`.
pub fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ChatUsage>,
    /// Some gateways report failures in a 200 body
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

/// Pull the completion text out of a decoded response body.
fn completion_text(resp: &mut ChatResponse) -> Result<String, PipelineError> {
    if let Some(err) = resp.error.take() {
        let status_code = err
            .code
            .as_ref()
            .and_then(|c| c.as_u64())
            .and_then(|c| u16::try_from(c).ok());
        return Err(PipelineError::Upstream {
            message: format!("API reported error: {}", err.message),
            status_code,
        });
    }

    let choice = resp.choices.first_mut().ok_or_else(|| PipelineError::Upstream {
        message: "API returned empty choices array".to_string(),
        status_code: None,
    })?;

    choice
        .message
        .content
        .take()
        .ok_or_else(|| PipelineError::Upstream {
            message: "API returned a choice without message content".to_string(),
            status_code: None,
        })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
        let body = self.build_body(request);

        tracing::debug!(
            "POST {} (model {}, {} image part(s))",
            self.endpoint,
            self.model,
            request.message.image_count()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Upstream {
                message: format!("request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream {
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let mut chat_resp: ChatResponse =
            resp.json().await.map_err(|e| PipelineError::Upstream {
                message: format!("failed to parse API response: {e}"),
                status_code: None,
            })?;

        let text = completion_text(&mut chat_resp)?;

        Ok(LlmResponse {
            text,
            model: chat_resp.model.unwrap_or_else(|| self.model.clone()),
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
        })
    }
}

//! LLM provider trait and request/response types.
//!
//! A request carries a single user turn made of ordered content parts. The
//! provider owns the wire format; the pipeline only sees [`LlmResponse::text`].

use crate::error::PipelineError;
use crate::pipeline::EncodedImage;
use async_trait::async_trait;

/// One piece of a chat turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Instruction text
    Text(String),
    /// Inline image as a data URI
    Image(String),
}

/// A single user turn: ordered text and image parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub parts: Vec<ContentPart>,
}

impl Message {
    /// Start a message with one text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    /// Append an image part.
    pub fn push_image(&mut self, image: &EncodedImage) {
        self.parts.push(ContentPart::Image(image.as_str().to_string()));
    }

    /// Number of image parts.
    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ContentPart::Image(_)))
            .count()
    }
}

/// A chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// The user turn to submit
    pub message: Message,
    /// Maximum tokens to generate; provider default when `None`
    pub max_tokens: Option<u32>,
    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            max_tokens: None,
            temperature: None,
        }
    }
}

/// The response from a chat-completion call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw completion text, untrimmed
    pub text: String,
    /// Model identifier reported by the API
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
}

/// Trait that chat-completion backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the processor holds a `Box<dyn LlmProvider>`).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Submit one request. Implementations must not retry.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text_then_images() {
        let mut message = Message::text("extract");
        message.push_image(&EncodedImage::from_bytes(b"a", "image/png"));
        message.push_image(&EncodedImage::from_bytes(b"b", "image/jpeg"));

        assert_eq!(message.parts.len(), 3);
        assert_eq!(message.image_count(), 2);
        assert_eq!(message.parts[0], ContentPart::Text("extract".to_string()));
        assert_eq!(
            message.parts[2],
            ContentPart::Image("data:image/jpeg;base64,Yg==".to_string())
        );
    }

    #[test]
    fn test_request_defaults_leave_sampling_unset() {
        let request = LlmRequest::new(Message::text("x"));
        assert!(request.max_tokens.is_none());
        assert!(request.temperature.is_none());
    }
}

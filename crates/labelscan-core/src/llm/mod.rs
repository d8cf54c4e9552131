//! LLM integration for label extraction.
//!
//! Provides the provider abstraction, the OpenAI-compatible chat-completions
//! backend, and prompt assembly around the product template.

pub mod openai;
pub mod prompt;
pub mod provider;

pub use openai::OpenAiProvider;
pub use prompt::{build_message, instruction_text};
pub use provider::{ContentPart, LlmProvider, LlmRequest, LlmResponse, Message};

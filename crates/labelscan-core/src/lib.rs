//! LabelScan Core - product-label extraction through a multimodal LLM.
//!
//! Takes one or more photos of a product's packaging, asks a hosted
//! OpenAI-compatible chat model to read the Russian-language label text and
//! fill a fixed product template, and returns the result as JSON.
//!
//! # Architecture
//!
//! ```text
//! Image files → Data URIs → Prompt (text + images) → Chat completion → { … } scan → Record
//! ```
//!
//! Remote failures (API errors, replies without a parseable object) never
//! surface as errors: the caller gets the untouched template instead. Local
//! setup defects (unreadable images, bad key file, bad config) do propagate.
//!
//! # Usage
//!
//! ```rust,ignore
//! use labelscan_core::{load_api_key, Config, OpenAiProvider, Processor};
//!
//! #[tokio::main]
//! async fn main() -> labelscan_core::Result<()> {
//!     let config = Config::load()?;
//!     let key = load_api_key(&config.credential_path())?;
//!     let provider = OpenAiProvider::from_config(&config.llm, key);
//!
//!     let mut processor = Processor::new(Box::new(provider));
//!     processor.initialize_images(vec!["front.jpg", "back.jpg"])?;
//!     let extraction = processor.run().await;
//!     println!("{}", extraction.record);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod credentials;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use credentials::{load_api_key, ApiKey};
pub use error::{ConfigError, CredentialError, LabelScanError, PipelineError, Result};
pub use llm::{LlmProvider, OpenAiProvider};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{encode_image, EncodedImage, ExtractionRequest, ImagePaths, Processor};
pub use schema::{SchemaTemplate, NOT_AVAILABLE};
pub use types::{Extraction, ProductRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

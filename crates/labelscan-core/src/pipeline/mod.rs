//! Extraction pipeline components.
//!
//! - **encode**: Read image files into inline data URIs
//! - **extract**: Recover the JSON record from a free-form model reply
//! - **processor**: Orchestrates encode → prompt → API call → extract

pub mod encode;
pub mod extract;
pub mod processor;

// Re-exports for convenient access
pub use encode::{encode_image, guess_mime, EncodedImage};
pub use extract::{brace_span, extract_record};
pub use processor::{ExtractionRequest, ImagePaths, Processor};

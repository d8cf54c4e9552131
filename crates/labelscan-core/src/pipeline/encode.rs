//! Image file to inline data URI encoding.

use base64::Engine;
use std::path::Path;

use crate::error::PipelineError;

/// MIME type used when the extension gives no answer.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// One image as a `data:<mime>;base64,<payload>` URI, ready for an
/// OpenAI-style `image_url` content part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    uri: String,
    media_type_len: usize,
}

impl EncodedImage {
    /// Build from raw bytes and a MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            uri: format!("data:{media_type};base64,{payload}"),
            media_type_len: media_type.len(),
        }
    }

    /// The full data URI.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The MIME type embedded in the URI.
    pub fn media_type(&self) -> &str {
        &self.uri["data:".len().."data:".len() + self.media_type_len]
    }
}

impl AsRef<str> for EncodedImage {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.uri
    }
}

/// Guess the MIME type from the file extension, falling back to `image/jpeg`.
pub fn guess_mime(path: &Path) -> &'static str {
    mime_guess::from_path(path).first_raw().unwrap_or(FALLBACK_MIME)
}

/// Read an image file and encode it as a data URI.
///
/// A file that cannot be opened is a [`PipelineError::FileAccess`]; there is
/// no local recovery.
pub fn encode_image(path: &Path) -> Result<EncodedImage, PipelineError> {
    let media_type = guess_mime(path);
    let bytes = std::fs::read(path).map_err(|source| PipelineError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        "Encoded {:?} as {} ({} bytes)",
        path,
        media_type,
        bytes.len()
    );
    Ok(EncodedImage::from_bytes(&bytes, media_type))
}

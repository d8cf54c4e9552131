//! Error types for the label extraction pipeline.
//!
//! Local setup defects (config, credentials, unreadable images) propagate to
//! the caller. Failures attributable to the remote model are represented by
//! [`PipelineError::ResponseFormat`] and [`PipelineError::Upstream`], which the
//! processor absorbs into the template fallback instead of returning.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for LabelScan operations.
#[derive(Error, Debug)]
pub enum LabelScanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential file errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors loading the base64-encoded API key file.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The key file is missing or unreadable
    #[error("Failed to read credential file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid base64
    #[error("Credential file {path} is not valid base64: {message}")]
    Decode { path: PathBuf, message: String },

    /// The decoded key is not valid UTF-8
    #[error("Decoded key in {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    /// The decoded key is empty
    #[error("Credential file {path} contains an empty key")]
    Empty { path: PathBuf },
}

/// Pipeline processing errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An image file could not be opened or read
    #[error("Cannot read image {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model reply holds no parseable JSON object between its first `{` and last `}`
    #[error("Model output cannot be interpreted as JSON: {message}")]
    ResponseFormat { message: String },

    /// The chat-completion call itself failed
    #[error("LLM API request failed: {message}")]
    Upstream {
        message: String,
        status_code: Option<u16>,
    },
}

/// Convenience type alias for LabelScan results.
pub type Result<T> = std::result::Result<T, LabelScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message() {
        let err = PipelineError::Upstream {
            message: "HTTP 401: unauthorized".to_string(),
            status_code: Some(401),
        };
        assert_eq!(
            err.to_string(),
            "LLM API request failed: HTTP 401: unauthorized"
        );
    }

    #[test]
    fn test_file_access_message_names_path() {
        let access = PipelineError::FileAccess {
            path: PathBuf::from("missing.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(access.to_string().contains("missing.jpg"));
    }

    #[test]
    fn test_pipeline_error_converts_to_top_level() {
        let err: LabelScanError = PipelineError::ResponseFormat {
            message: "bad".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Pipeline error:"));
    }
}

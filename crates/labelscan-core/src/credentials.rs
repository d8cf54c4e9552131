//! API key loading from a base64-encoded key file.

use crate::error::CredentialError;
use base64::Engine;
use std::fmt;
use std::path::Path;

/// A decoded API key. `Debug` output never includes the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(<{} chars>)", self.0.len())
    }
}

/// Read and decode the key file once.
///
/// Surrounding whitespace (a trailing newline, typically) is ignored before
/// decoding.
pub fn load_api_key(path: &Path) -> Result<ApiKey, CredentialError> {
    let content = std::fs::read_to_string(path).map_err(|source| CredentialError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(content.trim())
        .map_err(|e| CredentialError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let key = String::from_utf8(bytes).map_err(|_| CredentialError::NotUtf8 {
        path: path.to_path_buf(),
    })?;

    if key.trim().is_empty() {
        return Err(CredentialError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!("Loaded API key from {:?} ({} chars)", path, key.len());
    Ok(ApiKey(key))
}

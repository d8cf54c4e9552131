//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.llm.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.base_url must not be empty".into(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(
                "llm.base_url must start with http:// or https://".into(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".into(),
            ));
        }
        if self.llm.credential_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.credential_file must not be empty".into(),
            ));
        }
        if self.llm.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "llm.timeout_ms must be > 0 when set".into(),
            ));
        }
        if self.llm.max_tokens == Some(0) {
            return Err(ConfigError::ValidationError(
                "llm.max_tokens must be > 0 when set".into(),
            ));
        }
        if let Some(t) = self.llm.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(
                    "llm.temperature must be between 0.0 and 2.0".into(),
                ));
            }
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}

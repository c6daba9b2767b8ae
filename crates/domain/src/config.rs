//! Asserter configuration.
//!
//! Loaded from YAML, e.g. a fixture file shared by a test suite:
//!
//! ```yaml
//! default_success_status: 200
//! require_error_status: false
//! max_preview_len: 120
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::json::DEFAULT_PREVIEW_LEN;
use crate::response::StatusCode;

/// Settings shared by every check of an asserter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsserterConfig {
    /// Status expected by success checks that do not name one.
    pub default_success_status: u16,
    /// When set, error checks without an expected status require the body's
    /// `status` to be null.
    pub require_error_status: bool,
    /// Maximum length of values rendered in failure messages.
    pub max_preview_len: usize,
}

impl AsserterConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_success_status: 200,
            require_error_status: false,
            max_preview_len: DEFAULT_PREVIEW_LEN,
        }
    }

    /// Sets the default success status.
    #[must_use]
    pub const fn with_default_success_status(mut self, status: u16) -> Self {
        self.default_success_status = status;
        self
    }

    /// Sets whether error checks require a null `status` when none is expected.
    #[must_use]
    pub const fn with_require_error_status(mut self, require: bool) -> Self {
        self.require_error_status = require;
        self
    }

    /// Sets the maximum preview length.
    #[must_use]
    pub const fn with_max_preview_len(mut self, len: usize) -> Self {
        self.max_preview_len = len;
        self
    }

    /// Parses and validates a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfig`] if the document is malformed or
    /// fails [`validate`](Self::validate).
    pub fn from_yaml_str(yaml: &str) -> DomainResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| DomainError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Io`] if the file cannot be read, or
    /// [`DomainError::InvalidConfig`] if its content is invalid.
    pub fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Io(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfig`] for an invalid default status or
    /// a zero preview length.
    pub fn validate(&self) -> DomainResult<()> {
        if !StatusCode::new(self.default_success_status).is_valid() {
            return Err(DomainError::InvalidConfig(format!(
                "default_success_status {} is not a valid HTTP status",
                self.default_success_status
            )));
        }
        if self.max_preview_len == 0 {
            return Err(DomainError::InvalidConfig(
                "max_preview_len must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AsserterConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! Authorization endpoint configuration.

use serde::{Deserialize, Serialize};

/// Default cap on a POSTed form body.
pub const DEFAULT_MAX_FORM_BODY_BYTES: usize = 64 * 1024;

/// Default mount path of the endpoint.
pub const DEFAULT_AUTHORIZE_PATH: &str = "/authorize";

/// Settings for the authorization endpoint.
///
/// # Example
///
/// ```toml
/// [authorize]
/// path = "/authorize"
/// max_form_body_bytes = 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizeConfig {
    /// Route the endpoint is mounted on.
    pub path: String,

    /// Largest form body accepted on POST, in bytes.
    pub max_form_body_bytes: usize,
}

impl Default for AuthorizeConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_AUTHORIZE_PATH.to_string(),
            max_form_body_bytes: DEFAULT_MAX_FORM_BODY_BYTES,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl AuthorizeConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The path does not start with `/`
    /// - The form body limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "authorize.path must start with '/', got '{}'",
                self.path
            )));
        }

        if self.max_form_body_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "authorize.max_form_body_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

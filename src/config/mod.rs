//! Configuration for a forward request run.
//!
//! Every environment-derived value enters the pipeline through [`RelayClientConfig`],
//! which is validated once at construction. Nothing downstream reads the environment.

use thiserror::Error;

mod relay_config;
pub use relay_config::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required value: {0}")]
    MissingValue(String),
    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ConfigError::Validation(errors.to_string())
    }
}

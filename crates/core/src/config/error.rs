//! Error types for page configuration.
//!
//! This module defines all errors that can occur while loading a page
//! configuration file and validating it before polling starts.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Neither a page-level status URL nor any process entry was supplied.
    #[error("No status endpoint configured")]
    MissingEndpoint,

    /// The cross-site request forgery token is absent or blank.
    #[error("No CSRF token configured")]
    MissingCsrfToken,

    /// Two tracked processes share an id.
    #[error("Process id '{id}' is registered more than once")]
    DuplicateProcess { id: String },

    /// A URL in the configuration could not be parsed.
    #[error("Invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    /// Any other inconsistent setting.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ConfigError {
    /// Whether the error means the page did not supply what polling needs,
    /// as opposed to supplying something malformed.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingEndpoint | ConfigError::MissingCsrfToken
        )
    }
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

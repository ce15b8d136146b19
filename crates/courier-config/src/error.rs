use std::io;
use thiserror::Error;

use crate::template::TemplateError;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// Path to the config file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse config file at {path}: {source}")]
    ParseError {
        /// Path to the config file that failed to parse.
        path: String,
        /// Underlying TOML parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Field that failed validation.
        field: String,
        /// Validation failure description.
        message: String,
    },

    /// A path or download URL template could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A template field was asked for but never configured.
    #[error("No template configured for '{field}'")]
    MissingTemplate {
        /// Dotted name of the template field (e.g. `upload.sftp.mirror.path`).
        field: String,
    },

    /// A resolved numeric value could not be parsed or is out of range.
    #[error("Invalid value '{value}' for numeric field '{field}'")]
    InvalidNumber {
        /// Field whose resolved value is invalid.
        field: String,
        /// The offending resolved value.
        value: String,
    },

    /// The effective configuration could not be rendered.
    #[error("Failed to render configuration: {0}")]
    Render(String),

    /// Could not determine home directory.
    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

//! Configuration errors raised by the validation engine
//!
//! Problems with the *document* never show up here: they are reported as
//! [`ValidationError`](crate::ValidationError) entries in a report. These
//! errors mean the engine itself was misconfigured or its inputs could not be
//! read.

use thiserror::Error;

/// Result type for operations that can fail on configuration
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Errors signalling misuse rather than bad input data
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A schema could not be coerced
    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] recordschema_core::Error),

    /// A resource type config is malformed
    #[error("Invalid resource type config: {message}")]
    InvalidResourceConfig { message: String },

    /// A schema binding required by the validator is missing or duplicated
    #[error("Missing schema: {message}")]
    MissingSchema { message: String },

    /// JSON/YAML parsing errors
    #[error("Parsing error: {message}")]
    ParseError { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl ConfigurationError {
    /// Create an invalid resource config error
    pub fn invalid_resource_config(message: impl Into<String>) -> Self {
        Self::InvalidResourceConfig {
            message: message.into(),
        }
    }

    /// Create a missing schema error
    pub fn missing_schema(message: impl Into<String>) -> Self {
        Self::MissingSchema {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::IoError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(format!("JSON parsing error: {}", err))
    }
}

//! Error types for RecordSchema core operations.

use thiserror::Error;

/// Result type alias for RecordSchema core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or coercing schemas.
///
/// All of these indicate a misconfigured schema, never bad document data.
#[derive(Error, Debug)]
pub enum Error {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    YamlSerialization(#[from] serde_yaml::Error),

    /// Invalid schema structure
    #[error("Invalid schema structure: {0}")]
    InvalidSchema(String),

    /// Invalid field rule definition
    #[error("Invalid field rule at '{path}': {message}")]
    InvalidElement {
        /// Dotted path of the offending field inside the schema
        path: String,
        /// What is wrong with it
        message: String,
    },

    /// Unknown section name
    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

impl Error {
    /// Create an invalid field rule error
    pub fn invalid_element(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidElement {
            path: path.into(),
            message: message.into(),
        }
    }
}

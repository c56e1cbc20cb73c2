//! File loading for schemas, documents and resource type configs
//!
//! Files ending in `.yaml` / `.yml` are read as YAML, everything else as
//! JSON. Every failure is a [`ConfigurationError`] carrying the file path.

use recordschema_core::{coerce, Schema};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::{ConfigResult, ConfigurationError, ResourceTypeConfig};

/// Whether a path names a YAML file
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Read a JSON or YAML file into a JSON value
pub fn read_value(path: impl AsRef<Path>) -> ConfigResult<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|err| ConfigurationError::io_error(format!("{}: {}", path.display(), err)))?;

    debug!(path = %path.display(), bytes = content.len(), "read file");

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|err| {
            ConfigurationError::parse_error(format!("{}: YAML parsing error: {}", path.display(), err))
        })
    } else {
        serde_json::from_str(&content).map_err(|err| {
            ConfigurationError::parse_error(format!("{}: JSON parsing error: {}", path.display(), err))
        })
    }
}

/// Load and coerce a schema file
pub fn load_schema(path: impl AsRef<Path>) -> ConfigResult<Schema> {
    let raw = read_value(path)?;
    Ok(coerce(&raw)?)
}

/// Load a document to validate
pub fn load_document(path: impl AsRef<Path>) -> ConfigResult<Value> {
    read_value(path)
}

/// Load a resource type config file
pub fn load_resource_config(path: impl AsRef<Path>) -> ConfigResult<ResourceTypeConfig> {
    ResourceTypeConfig::from_value(&read_value(path)?)
}

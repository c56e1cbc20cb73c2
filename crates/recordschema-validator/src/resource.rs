//! Resource type presence check
//!
//! A document passes when at least one of the configured resource types is a
//! top-level key. This gates the structural validation. The same config can
//! be applied one level down, to each entry of a section, where a key only
//! counts when its value is populated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{ConfigResult, ConfigurationError, Status, StatusReport};

/// Resource type config: `{"resource_type": ["Patient", "Encounter"]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTypeConfig {
    /// Resource keys, at least one of which must be present
    #[serde(default)]
    pub resource_type: Vec<String>,
}

impl ResourceTypeConfig {
    /// Create a config from resource type names
    pub fn new<I, S>(resource_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource_type: resource_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Read a config from parsed JSON, rejecting anything but an object
    /// with a string list under `resource_type`
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        if !value.is_object() {
            return Err(ConfigurationError::invalid_resource_config(
                "config must be a JSON object",
            ));
        }
        serde_json::from_value(value.clone())
            .map_err(|err| ConfigurationError::invalid_resource_config(err.to_string()))
    }
}

/// Outcome of a presence check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceOutcome {
    /// Configured resource types found in the document
    pub present: Vec<String>,
    /// Configured resource types not found
    pub missing: Vec<String>,
}

impl PresenceOutcome {
    /// At least one configured type is present, or none are configured
    pub fn is_success(&self) -> bool {
        !self.present.is_empty() || self.missing.is_empty()
    }

    /// Condense into the `{status, message}` result format
    pub fn to_status(&self) -> StatusReport {
        if self.is_success() {
            StatusReport {
                status: Status::Success,
                message: format!(
                    "Resource types present in JSON data: {}",
                    self.present.join(", ")
                ),
            }
        } else {
            StatusReport {
                status: Status::Failed,
                message: format!(
                    "None of the resource types is present in JSON data: {}",
                    self.missing.join(", ")
                ),
            }
        }
    }
}

/// Checks a document for configured resource keys
#[derive(Debug, Clone)]
pub struct ResourcePresenceCheck {
    config: ResourceTypeConfig,
}

impl ResourcePresenceCheck {
    /// Create a new presence check
    pub fn new(config: ResourceTypeConfig) -> Self {
        if config.resource_type.is_empty() {
            warn!("resource type config is empty, every document will pass the presence check");
        }
        Self { config }
    }

    /// Configured resource types
    pub fn resource_types(&self) -> &[String] {
        &self.config.resource_type
    }

    /// Check which configured resource types are keys of `document`
    ///
    /// A configured name also matches its capitalized form, so `patient`
    /// finds a `Patient` key.
    pub fn check(&self, document: &Value) -> PresenceOutcome {
        self.partition(document, |_| true)
    }

    /// Check which configured keys of a section entry hold a value
    ///
    /// `null`, `false`, `0`, `""`, `[]` and `{}` do not count.
    pub fn check_populated(&self, entry: &Value) -> PresenceOutcome {
        self.partition(entry, is_populated)
    }

    fn partition(&self, value: &Value, accept: impl Fn(&Value) -> bool) -> PresenceOutcome {
        let keys = value.as_object();
        let (present, missing): (Vec<String>, Vec<String>) = self
            .config
            .resource_type
            .iter()
            .cloned()
            .partition(|resource| {
                keys.is_some_and(|keys| {
                    keys.get(resource.as_str())
                        .or_else(|| keys.get(capitalize(resource).as_str()))
                        .is_some_and(&accept)
                })
            });

        PresenceOutcome { present, missing }
    }
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn check() -> ResourcePresenceCheck {
        ResourcePresenceCheck::new(ResourceTypeConfig::new(["Patient", "Encounter"]))
    }

    #[test]
    fn test_one_match_is_enough() {
        let outcome = check().check(&json!({"Encounter": [{"EncounterBk": "E1"}]}));
        assert!(outcome.is_success());
        assert_eq!(outcome.present, vec!["Encounter".to_string()]);
        assert_eq!(outcome.missing, vec!["Patient".to_string()]);
        assert_eq!(outcome.to_status().status, Status::Success);
    }

    #[test]
    fn test_no_match_fails() {
        let outcome = check().check(&json!({"Observation": [{}]}));
        assert!(!outcome.is_success());

        let status = outcome.to_status();
        assert_eq!(status.status, Status::Failed);
        assert_eq!(
            status.message,
            "None of the resource types is present in JSON data: Patient, Encounter"
        );
    }

    #[test]
    fn test_non_object_document_fails() {
        assert!(!check().check(&json!([{"Patient": []}])).is_success());
    }

    #[test]
    fn test_lowercase_config_names_match() {
        let check = ResourcePresenceCheck::new(ResourceTypeConfig::new(["patient"]));
        assert!(check.check(&json!({"Patient": []})).is_success());
    }

    #[test]
    fn test_config_from_value() {
        let config = ResourceTypeConfig::from_value(&json!({"resource_type": ["Patient"]})).unwrap();
        assert_eq!(config.resource_type, vec!["Patient".to_string()]);

        assert!(matches!(
            ResourceTypeConfig::from_value(&json!(["Patient"])),
            Err(ConfigurationError::InvalidResourceConfig { .. })
        ));
        assert!(matches!(
            ResourceTypeConfig::from_value(&json!({"resource_type": "Patient"})),
            Err(ConfigurationError::InvalidResourceConfig { .. })
        ));
    }

    #[test]
    fn test_populated_entry_keys() {
        let check = ResourcePresenceCheck::new(ResourceTypeConfig::new([
            "Info",
            "Address",
            "Identification",
            "Email",
            "Phone",
        ]));

        let outcome = check.check_populated(&json!({"PatientBk": "A", "Email": "a@example.org", "Phone": []}));
        assert!(outcome.is_success());
        assert_eq!(outcome.present, vec!["Email".to_string()]);

        let empty = json!({"PatientBk": "A", "Info": {}, "Address": null, "Email": "", "Phone": []});
        assert!(!check.check_populated(&empty).is_success());
        assert!(check.check(&empty).is_success());
    }

    #[test]
    fn test_empty_config_passes() {
        let check = ResourcePresenceCheck::new(ResourceTypeConfig::default());
        assert!(check.check(&json!({})).is_success());
    }
}

//! Validation profiles
//!
//! A profile is a YAML or JSON file naming the schema for each section and,
//! optionally, the resource type config:
//!
//! ```yaml
//! resource_types: resource_types.json
//! policy: collect-all
//! sections:
//!   Patient:
//!     schema: schemas/patient.json
//!     required: true
//!     entry_keys: [Info, Address, Identification, Email, Phone]
//!   PatientAddress:
//!     schema: schemas/address.yaml
//! ```
//!
//! Relative paths resolve against the profile's directory.

use recordschema_core::Section;
use recordschema_validator::{
    loader, ConfigResult, ConfigurationError, DocumentValidator, Policy, ResourceTypeConfig, ValidationConfig,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Schema binding of one section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionProfile {
    /// Schema file
    pub schema: PathBuf,
    /// Report the section when absent
    #[serde(default)]
    pub required: bool,
    /// Keys of which every entry must populate at least one
    #[serde(default)]
    pub entry_keys: Vec<String>,
}

/// Everything needed to build a [`DocumentValidator`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationProfile {
    /// Resource type config file gating validation
    #[serde(default)]
    pub resource_types: Option<PathBuf>,
    /// Error policy
    #[serde(default)]
    pub policy: Policy,
    /// Keep at most this many errors in a report
    #[serde(default)]
    pub max_reported_errors: Option<usize>,
    /// Section schemas
    pub sections: BTreeMap<Section, SectionProfile>,
}

impl ValidationProfile {
    /// Load a profile and resolve its relative paths
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = loader::read_value(path)?;
        let mut profile: ValidationProfile = serde_json::from_value(raw).map_err(|err| {
            ConfigurationError::parse_error(format!("{}: invalid profile: {}", path.display(), err))
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        profile.resolve_paths(base_dir);
        debug!(profile = %path.display(), sections = profile.sections.len(), "loaded validation profile");
        Ok(profile)
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        };

        if let Some(resource_types) = self.resource_types.as_mut() {
            resolve(resource_types);
        }
        for section in self.sections.values_mut() {
            resolve(&mut section.schema);
        }
    }

    /// Load every schema and build the validator
    pub fn build_validator(&self, policy_override: Option<Policy>) -> ConfigResult<DocumentValidator> {
        let mut builder = DocumentValidator::builder().config(ValidationConfig {
            policy: policy_override.unwrap_or(self.policy),
            max_reported_errors: self.max_reported_errors,
            ..ValidationConfig::default()
        });

        for (section, binding) in &self.sections {
            let schema = loader::load_schema(&binding.schema)?;
            debug!(%section, schema = %binding.schema.display(), fields = schema.len(), "loaded section schema");
            builder = if binding.required {
                builder.required_section(*section, schema)
            } else {
                builder.section(*section, schema)
            };
            if !binding.entry_keys.is_empty() {
                builder = builder.entry_keys(*section, ResourceTypeConfig::new(binding.entry_keys.iter().cloned()));
            }
        }

        if let Some(path) = &self.resource_types {
            builder = builder.resource_types(loader::load_resource_config(path)?);
        }

        builder.build()
    }
}

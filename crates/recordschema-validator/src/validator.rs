//! Document validation orchestrator
//!
//! Composes the resource type presence check and the structural validator
//! over the configured sections. Top-level sections (`Patient`, `Encounter`)
//! are validated entry by entry; nested sections (`PatientAddress`,
//! `PatientPhone`) are resolved inside every entry of their parent section
//! and must appear in each of them.

use recordschema_core::{value_type_name, Cardinality, Schema, Section};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::{
    report::ROOT_PATH,
    structure::{index_path, join_path},
    ConfigResult, ConfigurationError, ResourcePresenceCheck, ResourceTypeConfig, StructuralValidator,
    ValidationConfig, ValidationError, ValidationReport, ValidationStats,
};

/// Association between a section and the schema validating it
#[derive(Debug, Clone)]
pub struct SectionBinding {
    /// Section name
    pub section: Section,
    /// Schema for each object of the section
    pub schema: Arc<Schema>,
    /// Report a top-level section when it is absent from the document
    pub required: bool,
    /// Keys of which every entry must populate at least one
    pub entry_keys: Option<ResourcePresenceCheck>,
}

/// Main validation engine for whole documents
///
/// Immutable once built; share it across threads behind an `Arc` or by
/// reference.
pub struct DocumentValidator {
    config: ValidationConfig,
    bindings: Vec<SectionBinding>,
    resource_check: Option<ResourcePresenceCheck>,
    structure: StructuralValidator,
}

impl DocumentValidator {
    /// Start configuring a validator
    pub fn builder() -> DocumentValidatorBuilder {
        DocumentValidatorBuilder::default()
    }

    /// Validation configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Configured sections, in validation order
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.bindings.iter().map(|binding| binding.section)
    }

    /// Schema bound to a section
    pub fn schema(&self, section: Section) -> Option<&Schema> {
        self.bindings
            .iter()
            .find(|binding| binding.section == section)
            .map(|binding| binding.schema.as_ref())
    }

    /// Validate a parsed document
    ///
    /// Never fails: every problem with the document becomes a
    /// [`ValidationError`] in the report.
    pub fn validate_document(&self, document: &Value) -> ValidationReport {
        let start_time = Instant::now();
        let mut errors = Vec::new();
        let mut stats = ValidationStats::default();

        self.validate_into(document, &mut errors, &mut stats);

        stats.errors_found = errors.len();
        if let Some(cap) = self.config.max_reported_errors {
            errors.truncate(cap);
        }
        stats.duration_ms = start_time.elapsed().as_millis() as u64;

        let report = ValidationReport::from_errors(errors, stats);
        info!(
            ok = report.ok,
            errors = report.stats.errors_found,
            duration_ms = report.stats.duration_ms,
            "document validated"
        );
        report
    }

    /// Parse JSON text and validate it
    ///
    /// JSON syntax errors are configuration errors, not validation results.
    pub fn validate_str(&self, text: &str) -> ConfigResult<ValidationReport> {
        let document: Value = serde_json::from_str(text)?;
        Ok(self.validate_document(&document))
    }

    fn validate_into(&self, document: &Value, errors: &mut Vec<ValidationError>, stats: &mut ValidationStats) {
        if self.config.check_resource_types {
            if let Some(check) = &self.resource_check {
                let outcome = check.check(document);
                if !outcome.is_success() {
                    errors.push(ValidationError::resource_type_missing(check.resource_types()));
                    return;
                }
                debug!(present = ?outcome.present, "resource type check passed");
            }
        }

        let Some(root) = document.as_object() else {
            errors.push(ValidationError::type_mismatch(ROOT_PATH, "object", value_type_name(document)));
            return;
        };

        for binding in &self.bindings {
            let before = errors.len();
            match binding.section.parent() {
                None => self.validate_top_level(root, binding, errors, stats),
                Some(parent) => self.validate_nested(root, parent, binding, errors, stats),
            }
            if self.config.policy.stops_at(errors.len() - before) {
                return;
            }
        }
    }

    fn validate_top_level(
        &self,
        root: &Map<String, Value>,
        binding: &SectionBinding,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        let name = binding.section.as_str();
        match root.get(name) {
            Some(value) => self.validate_section_value(value, binding, name, errors, stats),
            None if binding.required => errors.push(ValidationError::missing_section(name)),
            None => debug!(section = name, "section absent, skipping"),
        }
    }

    fn validate_nested(
        &self,
        root: &Map<String, Value>,
        parent: Section,
        binding: &SectionBinding,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        // Problems with the parent itself are reported by the parent's binding.
        let parents: Vec<(String, &Map<String, Value>)> = match root.get(parent.as_str()) {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    entry.as_object().map(|entry| (index_path(parent.as_str(), index), entry))
                })
                .collect(),
            Some(Value::Object(entry)) => vec![(parent.as_str().to_string(), entry)],
            _ => Vec::new(),
        };

        for (parent_path, entry) in parents {
            let path = join_path(&parent_path, binding.section.as_str());
            let before = errors.len();
            match entry.get(binding.section.as_str()) {
                Some(value) => self.validate_section_value(value, binding, &path, errors, stats),
                None => errors.push(ValidationError::missing_section(path)),
            }
            if self.config.policy.stops_at(errors.len() - before) {
                return;
            }
        }
    }

    fn validate_section_value(
        &self,
        value: &Value,
        binding: &SectionBinding,
        path: &str,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        stats.sections_validated += 1;
        let cardinality = binding.section.cardinality();

        match (value, cardinality) {
            (Value::Null, _) => errors.push(ValidationError::section_null(path)),
            (Value::Object(_), _) => self.validate_entry(value, binding, path, errors, stats),
            (Value::Array(entries), Cardinality::Many) => {
                for (index, entry) in entries.iter().enumerate() {
                    let before = errors.len();
                    self.validate_entry(entry, binding, &index_path(path, index), errors, stats);
                    if self.config.policy.stops_at(errors.len() - before) {
                        return;
                    }
                }
            }
            (other, Cardinality::Many) => {
                errors.push(ValidationError::type_mismatch(path, "array", value_type_name(other)));
            }
            (other, Cardinality::One) => {
                errors.push(ValidationError::type_mismatch(path, "object", value_type_name(other)));
            }
        }
    }

    fn validate_entry(
        &self,
        entry: &Value,
        binding: &SectionBinding,
        path: &str,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        if let (Some(check), true) = (&binding.entry_keys, entry.is_object()) {
            if !check.check_populated(entry).is_success() {
                errors.push(ValidationError::entry_keys_missing(path, check.resource_types()));
                if self.config.policy.stops_at(1) {
                    return;
                }
            }
        }
        self.structure.validate_object_entry(entry, &binding.schema, path, errors, stats);
    }
}

/// Builder for [`DocumentValidator`]
#[derive(Default)]
pub struct DocumentValidatorBuilder {
    config: ValidationConfig,
    bindings: BTreeMap<Section, SectionBinding>,
    duplicates: Vec<Section>,
    resource_types: Option<ResourceTypeConfig>,
    entry_keys: BTreeMap<Section, ResourceTypeConfig>,
}

impl DocumentValidatorBuilder {
    /// Bind a schema to a section
    ///
    /// An absent top-level section is skipped; an absent nested section is
    /// reported for every parent entry lacking it.
    pub fn section(self, section: Section, schema: impl Into<Arc<Schema>>) -> Self {
        self.bind(section, schema.into(), false)
    }

    /// Bind a schema to a section that must be present, top-level included
    pub fn required_section(self, section: Section, schema: impl Into<Arc<Schema>>) -> Self {
        self.bind(section, schema.into(), true)
    }

    /// Gate validation on a resource type presence check
    pub fn resource_types(mut self, config: ResourceTypeConfig) -> Self {
        self.resource_types = Some(config);
        self
    }

    /// Require every entry of `section` to populate at least one of the
    /// configured keys, e.g. `Info`, `Address` or `Phone` in each patient
    pub fn entry_keys(mut self, section: Section, config: ResourceTypeConfig) -> Self {
        self.entry_keys.insert(section, config);
        self
    }

    /// Replace the validation configuration
    pub fn config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the error policy
    pub fn policy(mut self, policy: crate::Policy) -> Self {
        self.config.policy = policy;
        self
    }

    fn bind(mut self, section: Section, schema: Arc<Schema>, required: bool) -> Self {
        let binding = SectionBinding {
            section,
            schema,
            required,
            entry_keys: None,
        };
        if self.bindings.insert(section, binding).is_some() {
            self.duplicates.push(section);
        }
        self
    }

    /// Build the validator
    ///
    /// Fails when no section is bound, a section is bound twice, or a nested
    /// section is bound without its parent.
    /// Entry key rules must target a bound section.
    pub fn build(mut self) -> ConfigResult<DocumentValidator> {
        if let Some(section) = self.duplicates.first() {
            return Err(ConfigurationError::missing_schema(format!(
                "section {} is bound more than once",
                section
            )));
        }
        if self.bindings.is_empty() {
            return Err(ConfigurationError::missing_schema("no section schema configured"));
        }
        for section in self.bindings.keys() {
            if let Some(parent) = section.parent() {
                if !self.bindings.contains_key(&parent) {
                    return Err(ConfigurationError::missing_schema(format!(
                        "section {} is nested under {}, which has no schema",
                        section, parent
                    )));
                }
            }
        }

        for (section, config) in std::mem::take(&mut self.entry_keys) {
            let Some(binding) = self.bindings.get_mut(&section) else {
                return Err(ConfigurationError::invalid_resource_config(format!(
                    "entry keys configured for {}, which has no schema",
                    section
                )));
            };
            binding.entry_keys = Some(ResourcePresenceCheck::new(config));
        }

        debug!(
            sections = ?self.bindings.keys().collect::<Vec<_>>(),
            policy = ?self.config.policy,
            "building document validator"
        );

        Ok(DocumentValidator {
            structure: StructuralValidator::new(self.config.policy),
            config: self.config,
            bindings: self.bindings.into_values().collect(),
            resource_check: self.resource_types.map(ResourcePresenceCheck::new),
        })
    }
}

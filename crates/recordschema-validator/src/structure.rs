//! Structural validation
//!
//! Walks a schema and a data object in lockstep. Scalar fields go to the
//! [`FieldValidator`]; object fields with `properties` and array fields with
//! `items` recurse. Depth is bounded by the schema, which is a finite tree.

use recordschema_core::{value_type_name, FieldRule, PrimitiveType, Schema};
use serde_json::Value;
use tracing::trace;

use crate::{FieldValidator, Policy, ValidationError, ValidationStats};

/// Structural validator for schema-described objects
pub struct StructuralValidator {
    policy: Policy,
    field_validator: FieldValidator,
}

impl StructuralValidator {
    /// Create a new structural validator with the given error policy
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            field_validator: FieldValidator::new(),
        }
    }

    /// Error policy in use
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Validate `data` against `schema`; `path` prefixes every error path
    pub fn validate(&self, data: &Value, schema: &Schema, path: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut stats = ValidationStats::default();
        self.validate_into(data, schema, path, &mut errors, &mut stats);
        errors
    }

    /// Validate `data` against `schema`, appending to `errors` and `stats`
    ///
    /// A `data` value that is not an object is treated as an object with no
    /// keys, so every required field is reported missing.
    pub fn validate_into(
        &self,
        data: &Value,
        schema: &Schema,
        path: &str,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        trace!(path, fields = schema.len(), "validating object");
        stats.objects_validated += 1;

        let object = data.as_object();
        for (name, rule) in schema.iter() {
            let field_path = join_path(path, name);
            let value = object.and_then(|object| object.get(name));
            let before = errors.len();

            if let Some(properties) = rule.nested_object() {
                self.validate_nested_object(value, rule, properties, &field_path, errors, stats);
            } else if let Some(items) = rule.nested_items() {
                self.validate_nested_array(value, rule, items, &field_path, errors, stats);
            } else {
                self.field_validator.validate_into(value, rule, &field_path, errors);
                stats.fields_validated += 1;
            }

            if self.policy.stops_at(errors.len() - before) {
                return;
            }
        }
    }

    fn validate_nested_object(
        &self,
        value: Option<&Value>,
        rule: &FieldRule,
        properties: &Schema,
        path: &str,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        match value {
            None if rule.required => errors.push(ValidationError::missing_required(path)),
            None => {}
            Some(Value::Null) => errors.push(ValidationError::section_null(path)),
            Some(nested @ Value::Object(_)) => self.validate_into(nested, properties, path, errors, stats),
            Some(other) => errors.push(ValidationError::type_mismatch(
                path,
                PrimitiveType::Object.as_str(),
                value_type_name(other),
            )),
        }
    }

    fn validate_nested_array(
        &self,
        value: Option<&Value>,
        rule: &FieldRule,
        items: &Schema,
        path: &str,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        let elements = match value {
            None | Some(Value::Null) => {
                if rule.required {
                    errors.push(ValidationError::missing_array(path));
                }
                return;
            }
            Some(Value::Array(elements)) => elements,
            Some(other) => {
                errors.push(ValidationError::type_mismatch(
                    path,
                    PrimitiveType::Array.as_str(),
                    value_type_name(other),
                ));
                return;
            }
        };

        for (index, element) in elements.iter().enumerate() {
            let before = errors.len();
            self.validate_object_entry(element, items, &index_path(path, index), errors, stats);
            if self.policy.stops_at(errors.len() - before) {
                return;
            }
        }
    }

    /// Validate one entry that must be an object, e.g. an array element or a section entry
    pub fn validate_object_entry(
        &self,
        entry: &Value,
        schema: &Schema,
        path: &str,
        errors: &mut Vec<ValidationError>,
        stats: &mut ValidationStats,
    ) {
        if entry.is_object() {
            self.validate_into(entry, schema, path, errors, stats);
        } else {
            errors.push(ValidationError::type_mismatch(
                path,
                PrimitiveType::Object.as_str(),
                value_type_name(entry),
            ));
        }
    }
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

/// `parent.name`, or `name` at the root
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// `path[index]`
pub fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

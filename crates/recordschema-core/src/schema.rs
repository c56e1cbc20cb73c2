//! Schema definition.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{coerce, FieldRule, Result};

/// A Schema is the contract for one JSON object shape: an ordered mapping
/// from field name to [`FieldRule`].
///
/// Declaration order is kept because it drives the order of reported errors.
/// A coerced schema is immutable in practice; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: IndexMap<String, FieldRule>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(name, rule);
        self
    }

    /// Add or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, rule: FieldRule) -> Option<FieldRule> {
        self.fields.insert(name.into(), rule)
    }

    /// Look up a field rule.
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the required fields, in declaration order.
    pub fn required_fields(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, rule)| rule.required)
            .map(|(name, _)| name)
            .collect()
    }

    /// Canonical raw form of this schema. Coercing it again yields an equal schema.
    pub fn to_raw(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse and coerce a schema from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text)?;
        coerce(&raw)
    }

    /// Parse and coerce a schema from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(text)?;
        coerce(&raw)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        coerce(&raw).map_err(serde::de::Error::custom)
    }
}

//! Field rule definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::Schema;

/// Primitive type tag of a field, matched against the JSON variant of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// JSON string
    #[serde(rename = "string")]
    String,
    /// JSON number stored as an integer
    #[serde(rename = "int")]
    Integer,
    /// JSON number stored as floating point
    #[serde(rename = "float")]
    Float,
    /// JSON boolean
    #[serde(rename = "bool")]
    Bool,
    /// JSON object
    #[serde(rename = "object")]
    Object,
    /// JSON array
    #[serde(rename = "array")]
    Array,
}

impl PrimitiveType {
    /// Canonical type name, as written in a schema file.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Object => "object",
            PrimitiveType::Array => "array",
        }
    }

    /// Resolve a declared type name, accepting the common aliases.
    ///
    /// Returns `None` for names that are not primitive type names; callers
    /// decide what an unknown name means.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" | "str" => Some(PrimitiveType::String),
            "int" | "integer" => Some(PrimitiveType::Integer),
            "float" | "number" | "decimal" => Some(PrimitiveType::Float),
            "bool" | "boolean" => Some(PrimitiveType::Bool),
            "object" | "dict" => Some(PrimitiveType::Object),
            "array" | "list" => Some(PrimitiveType::Array),
            _ => None,
        }
    }

    /// Whether a JSON value carries this type tag. No coercion is attempted.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveType::String => value.is_string(),
            PrimitiveType::Integer => value.is_i64() || value.is_u64(),
            PrimitiveType::Float => value.is_f64(),
            PrimitiveType::Bool => value.is_boolean(),
            PrimitiveType::Object => value.is_object(),
            PrimitiveType::Array => value.is_array(),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String format checked on top of the `string` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringFormat {
    /// `YYYY-MM-DD`
    #[serde(rename = "date")]
    Date,
    /// `YYYY-MM-DDTHH:MM:SS`
    #[serde(rename = "date-time")]
    DateTime,
}

impl StringFormat {
    /// Canonical format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Date => "date",
            StringFormat::DateTime => "date-time",
        }
    }

    /// Resolve a declared format name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date" => Some(StringFormat::Date),
            "date-time" | "datetime" | "dateTime" => Some(StringFormat::DateTime),
            _ => None,
        }
    }

    /// Human readable pattern, used in error messages.
    pub fn pattern(&self) -> &'static str {
        match self {
            StringFormat::Date => "YYYY-MM-DD",
            StringFormat::DateTime => "YYYY-MM-DDTHH:MM:SS",
        }
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation rule for one field of a schema.
///
/// `properties` is only set for [`PrimitiveType::Object`] rules and `items`
/// only for [`PrimitiveType::Array`] rules; the constructors and the coercer
/// keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRule {
    /// Expected primitive type
    #[serde(rename = "type")]
    pub field_type: PrimitiveType,

    /// Whether the field must be present and non-empty
    pub required: bool,

    /// Optional string format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,

    /// Nested schema for object fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Schema>,

    /// Item schema for arrays of objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Schema>,
}

impl FieldRule {
    /// Create an optional rule of the given type.
    pub fn new(field_type: PrimitiveType) -> Self {
        Self {
            field_type,
            required: false,
            format: None,
            properties: None,
            items: None,
        }
    }

    /// Optional string rule.
    pub fn string() -> Self {
        Self::new(PrimitiveType::String)
    }

    /// Object rule with a nested schema.
    pub fn object(properties: Schema) -> Self {
        Self {
            properties: Some(properties),
            ..Self::new(PrimitiveType::Object)
        }
    }

    /// Array rule whose elements are objects validated against `items`.
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(items),
            ..Self::new(PrimitiveType::Array)
        }
    }

    /// Mark the rule as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Attach a string format.
    pub fn with_format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Nested object schema, if this rule describes one.
    pub fn nested_object(&self) -> Option<&Schema> {
        match self.field_type {
            PrimitiveType::Object => self.properties.as_ref(),
            _ => None,
        }
    }

    /// Item schema, if this rule describes an array of objects.
    pub fn nested_items(&self) -> Option<&Schema> {
        match self.field_type {
            PrimitiveType::Array => self.items.as_ref(),
            _ => None,
        }
    }
}

/// Type name of a JSON value using the schema vocabulary.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

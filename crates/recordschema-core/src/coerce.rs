//! Type coercion from raw schema JSON into [`Schema`] trees.
//!
//! A raw field rule is accepted in three shapes:
//!
//! - an explicit rule: `{"type": "int", "required": true, "format": ..., "properties": ..., "items": ...}`
//! - a single-item array template: `[ { ...item schema... } ]`, optionally carrying
//!   a boolean `"required"` next to the item fields
//! - a grouping object without `"type"` whose entries are all rules, read as an
//!   optional object with those entries as properties

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{Error, FieldRule, PrimitiveType, Result, Schema, StringFormat};

/// Legacy type name used by older patient schemas for the address sub-object.
const LEGACY_ADDRESS_TYPE: &str = "PatientAddress";

/// Coerce a raw schema into a [`Schema`].
///
/// Unknown or missing type names fall back to `string`. The only failures are
/// structural: a schema that is not an object, or a rule that is neither an
/// object nor an array template.
pub fn coerce(raw: &Value) -> Result<Schema> {
    match raw {
        Value::Object(fields) => coerce_fields(fields, ""),
        other => Err(Error::InvalidSchema(format!(
            "schema must be a JSON object, found {}",
            crate::value_type_name(other)
        ))),
    }
}

fn coerce_fields(fields: &Map<String, Value>, parent: &str) -> Result<Schema> {
    let mut schema = Schema::new();
    for (name, raw_rule) in fields {
        let path = join(parent, name);
        schema.insert(name.clone(), coerce_rule(raw_rule, &path)?);
    }
    Ok(schema)
}

fn coerce_rule(raw: &Value, path: &str) -> Result<FieldRule> {
    match raw {
        Value::Object(map) if is_grouping(map) => {
            debug!(field = path, "reading untyped grouping object as nested schema");
            Ok(FieldRule::object(coerce_fields(map, path)?))
        }
        Value::Object(map) => coerce_explicit(map, path),
        Value::Array(template) => coerce_template(template, path),
        other => Err(Error::invalid_element(
            path,
            format!("rule must be an object or a single-item array, found {}", crate::value_type_name(other)),
        )),
    }
}

fn coerce_explicit(map: &Map<String, Value>, path: &str) -> Result<FieldRule> {
    let (field_type, implied_format) = match map.get("type") {
        None if map.contains_key("properties") => (PrimitiveType::Object, None),
        None if map.contains_key("items") => (PrimitiveType::Array, None),
        declared => resolve_type(declared, path),
    };

    let required = match map.get("required") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(required)) => *required,
        Some(other) => {
            return Err(Error::invalid_element(
                path,
                format!("required must be a boolean, found {}", crate::value_type_name(other)),
            ));
        }
    };

    let format = match map.get("format") {
        Some(Value::String(name)) => StringFormat::from_name(name).or_else(|| {
            debug!(field = path, format = name.as_str(), "ignoring unknown format");
            None
        }),
        _ => None,
    }
    .or(implied_format);

    let mut rule = FieldRule::new(field_type).with_required(required);
    rule.format = format;

    if let Some(raw_properties) = map.get("properties") {
        if field_type == PrimitiveType::Object {
            let properties = raw_properties.as_object().ok_or_else(|| {
                Error::invalid_element(path, "properties must be an object")
            })?;
            rule.properties = Some(coerce_fields(properties, path)?);
        } else {
            warn!(field = path, field_type = %field_type, "dropping properties on non-object field");
        }
    }

    if let Some(raw_items) = map.get("items") {
        if field_type == PrimitiveType::Array {
            rule.items = Some(coerce_items(raw_items, path)?);
        } else {
            warn!(field = path, field_type = %field_type, "dropping items on non-array field");
        }
    }

    Ok(rule)
}

fn coerce_items(raw: &Value, path: &str) -> Result<Schema> {
    match raw {
        Value::Object(fields) => coerce_fields(fields, path),
        Value::Array(template) => match template.first() {
            Some(Value::Object(fields)) => coerce_fields(fields, path),
            _ => Err(Error::invalid_element(path, "items template must hold one object schema")),
        },
        _ => Err(Error::invalid_element(path, "items must be an object schema")),
    }
}

fn coerce_template(template: &[Value], path: &str) -> Result<FieldRule> {
    let item = match template {
        [] => return Err(Error::invalid_element(path, "array template is empty")),
        [Value::Object(item), rest @ ..] => {
            if !rest.is_empty() {
                warn!(field = path, extra = rest.len(), "array template has extra entries, using the first");
            }
            item
        }
        _ => return Err(Error::invalid_element(path, "array template must hold an object schema")),
    };

    let mut fields = item.clone();
    let required = match fields.get("required") {
        Some(Value::Bool(required)) => {
            let required = *required;
            fields.shift_remove("required");
            required
        }
        _ => false,
    };

    Ok(FieldRule::array(coerce_fields(&fields, path)?).with_required(required))
}

/// Map a declared type onto a tag and, for `date`-like type names, a format.
fn resolve_type(declared: Option<&Value>, path: &str) -> (PrimitiveType, Option<StringFormat>) {
    let name = match declared {
        Some(Value::String(name)) => name.as_str(),
        Some(other) => {
            debug!(field = path, found = crate::value_type_name(other), "non-string type, defaulting to string");
            return (PrimitiveType::String, None);
        }
        None => {
            debug!(field = path, "missing type, defaulting to string");
            return (PrimitiveType::String, None);
        }
    };

    if let Some(field_type) = PrimitiveType::from_type_name(name) {
        return (field_type, None);
    }
    if let Some(format) = StringFormat::from_name(name) {
        return (PrimitiveType::String, Some(format));
    }
    if name == LEGACY_ADDRESS_TYPE {
        return (PrimitiveType::Object, None);
    }

    // Default branch: any other type name is validated as a string.
    debug!(field = path, type_name = name, "unknown type, defaulting to string");
    (PrimitiveType::String, None)
}

/// An object without `type` whose every entry is itself a rule.
fn is_grouping(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && !map.contains_key("type")
        && !map.contains_key("properties")
        && !map.contains_key("items")
        && map.values().all(|value| value.is_object() || value.is_array())
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

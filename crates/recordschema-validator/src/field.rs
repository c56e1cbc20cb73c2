//! Field validation
//!
//! Checks a single field value against its rule: required-ness, primitive
//! type and, for strings, the `date` / `date-time` formats. Type checks compare
//! the rule's type tag with the JSON variant and never coerce.

use chrono::{NaiveDate, NaiveDateTime};
use recordschema_core::{value_type_name, FieldRule, StringFormat};
use regex::Regex;
use serde_json::Value;

use crate::ValidationError;

/// Field validator for scalar field rules
pub struct FieldValidator {
    // Exact shapes; chrono alone accepts unpadded numbers
    date_regex: Regex,
    datetime_regex: Regex,
}

impl FieldValidator {
    /// Create a new field validator
    pub fn new() -> Self {
        Self {
            date_regex: Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"),
            datetime_regex: Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$")
                .expect("date-time pattern is valid"),
        }
    }

    /// Validate one field value, `None` meaning the key is absent
    pub fn validate(&self, value: Option<&Value>, rule: &FieldRule, path: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate_into(value, rule, path, &mut errors);
        errors
    }

    /// Validate one field value, appending errors to `errors`
    ///
    /// At most one error is produced per field.
    pub fn validate_into(
        &self,
        value: Option<&Value>,
        rule: &FieldRule,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let value = match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        };

        let Some(value) = value else {
            if rule.required {
                errors.push(ValidationError::missing_required(path));
            }
            return;
        };

        if !rule.field_type.matches(value) {
            errors.push(ValidationError::type_mismatch(
                path,
                rule.field_type.as_str(),
                value_type_name(value),
            ));
            return;
        }

        if let (Some(format), Some(text)) = (rule.format, value.as_str()) {
            if !self.matches_format(text, format) {
                errors.push(ValidationError::format_mismatch(path, format, text));
            }
        }
    }

    /// Whether `text` is a strict rendering of `format`
    pub fn matches_format(&self, text: &str, format: StringFormat) -> bool {
        match format {
            StringFormat::Date => {
                self.date_regex.is_match(text) && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
            }
            StringFormat::DateTime => {
                self.datetime_regex.is_match(text)
                    && NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
            }
        }
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use recordschema_core::PrimitiveType;
    use serde_json::json;

    fn kinds(errors: &[ValidationError]) -> Vec<ErrorKind> {
        errors.iter().map(|error| error.kind).collect()
    }

    #[test]
    fn test_required_field() {
        let validator = FieldValidator::new();
        let rule = FieldRule::string().required();

        for value in [None, Some(json!(null)), Some(json!(""))] {
            let errors = validator.validate(value.as_ref(), &rule, "PatientBk");
            assert_eq!(kinds(&errors), vec![ErrorKind::MissingRequired]);
            assert_eq!(errors[0].path, "PatientBk");
        }

        assert!(validator.validate(Some(&json!("BK123")), &rule, "PatientBk").is_empty());
    }

    #[test]
    fn test_optional_field_skipped_when_absent() {
        let validator = FieldValidator::new();
        let rule = FieldRule::new(PrimitiveType::Integer);

        assert!(validator.validate(None, &rule, "BirthOrder").is_empty());
        assert!(validator.validate(Some(&json!(null)), &rule, "BirthOrder").is_empty());
        assert!(validator.validate(Some(&json!("")), &rule, "BirthOrder").is_empty());
    }

    #[test]
    fn test_type_mismatch() {
        let validator = FieldValidator::new();
        let rule = FieldRule::new(PrimitiveType::Integer);

        let errors = validator.validate(Some(&json!("3")), &rule, "BirthOrder");
        assert_eq!(kinds(&errors), vec![ErrorKind::TypeMismatch]);
        assert!(errors[0].message.contains("should be int, found string"));

        assert!(validator.validate(Some(&json!(3)), &rule, "BirthOrder").is_empty());

        let bool_rule = FieldRule::new(PrimitiveType::Bool);
        let errors = validator.validate(Some(&json!("Y")), &bool_rule, "ActiveInd");
        assert_eq!(kinds(&errors), vec![ErrorKind::TypeMismatch]);
    }

    #[test]
    fn test_date_format() {
        let validator = FieldValidator::new();
        let rule = FieldRule::string().with_format(StringFormat::Date);

        assert!(validator.validate(Some(&json!("2022-01-01")), &rule, "BirthTs").is_empty());

        for bad in ["2022-13-40", "2022-02-30", "2022-1-5", "2022-01", "01/01/2022", "2022-01-01T00:00:00"] {
            let errors = validator.validate(Some(&json!(bad)), &rule, "BirthTs");
            assert_eq!(kinds(&errors), vec![ErrorKind::FormatMismatch], "{bad}");
        }
    }

    #[test]
    fn test_datetime_format() {
        let validator = FieldValidator::new();
        let rule = FieldRule::string().with_format(StringFormat::DateTime);

        assert!(validator
            .validate(Some(&json!("2023-12-25T10:30:00")), &rule, "SourceTransactionTs")
            .is_empty());

        for bad in [
            "2023-12-25T10:30",
            "2023-12-25T10:30:00Z",
            "2023-12-25T10:30:00+02:00",
            "2023-12-25T10:30:00.123",
            "2023-12-25 10:30:00",
            "2023-12-25T25:00:00",
        ] {
            let errors = validator.validate(Some(&json!(bad)), &rule, "SourceTransactionTs");
            assert_eq!(kinds(&errors), vec![ErrorKind::FormatMismatch], "{bad}");
        }
    }

    #[test]
    fn test_format_skipped_after_type_mismatch() {
        let validator = FieldValidator::new();
        let rule = FieldRule::string().with_format(StringFormat::Date);

        let errors = validator.validate(Some(&json!(20220101)), &rule, "BirthTs");
        assert_eq!(kinds(&errors), vec![ErrorKind::TypeMismatch]);
    }
}

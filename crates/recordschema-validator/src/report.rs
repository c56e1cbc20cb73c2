//! Validation errors, reports and the `{status, message}` result format

use recordschema_core::StringFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Path used for errors about the document as a whole
pub const ROOT_PATH: &str = "$";

/// Message returned when a document passes validation
pub const SUCCESS_MESSAGE: &str = "JSON is valid against the schema.";

/// Category of a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// A required field or section is absent, null or empty
    MissingRequired,
    /// A value has the wrong JSON type
    TypeMismatch,
    /// A string does not match its declared format
    FormatMismatch,
    /// A required array is absent
    MissingArray,
    /// A section is absent from the document or from a parent entry
    SectionMissing,
    /// A nested section is present but null
    SectionNull,
    /// None of the configured resource types is present
    ResourceTypeMissing,
    /// A section entry has none of its expected keys populated
    EntryKeysMissing,
}

impl ErrorKind {
    /// Stable code for the kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequired => "missing-required",
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::FormatMismatch => "format-mismatch",
            ErrorKind::MissingArray => "missing-array",
            ErrorKind::SectionMissing => "section-missing",
            ErrorKind::SectionNull => "section-null",
            ErrorKind::ResourceTypeMissing => "resource-type-missing",
            ErrorKind::EntryKeysMissing => "entry-keys-missing",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One problem found in a document
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Dotted path from the document root, with `[i]` index markers
    pub path: String,
    /// Human-readable description
    pub message: String,
    /// Error category
    pub kind: ErrorKind,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(kind: ErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// A required field is absent, null or empty
    pub fn missing_required(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("Missing required field: {}", path);
        Self::new(ErrorKind::MissingRequired, path, message)
    }

    /// A section is absent from the document or from its parent entry
    pub fn missing_section(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("Missing section: {}", path);
        Self::new(ErrorKind::SectionMissing, path, message)
    }

    /// A value has the wrong JSON type
    pub fn type_mismatch(path: impl Into<String>, expected: &str, actual: &str) -> Self {
        let path = path.into();
        let message = format!("Field {} should be {}, found {}", path, expected, actual);
        Self::new(ErrorKind::TypeMismatch, path, message)
    }

    /// A string does not match its format
    pub fn format_mismatch(path: impl Into<String>, format: StringFormat, value: &str) -> Self {
        let path = path.into();
        let message = format!(
            "Field {} should be a valid {} ({}), found '{}'",
            path,
            format,
            format.pattern(),
            value
        );
        Self::new(ErrorKind::FormatMismatch, path, message)
    }

    /// A required array is absent
    pub fn missing_array(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("Missing required array: {}", path);
        Self::new(ErrorKind::MissingArray, path, message)
    }

    /// A nested section is present but null
    pub fn section_null(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("{} is null", path);
        Self::new(ErrorKind::SectionNull, path, message)
    }

    /// None of the expected resource types is in the document
    pub fn resource_type_missing(expected: &[String]) -> Self {
        let message = format!(
            "None of the resource types is present in JSON data: {}",
            expected.join(", ")
        );
        Self::new(ErrorKind::ResourceTypeMissing, ROOT_PATH, message)
    }

    /// None of `expected` is a populated key of the entry at `path`
    pub fn entry_keys_missing(path: impl Into<String>, expected: &[String]) -> Self {
        let path = path.into();
        let message = format!("At least one of {} is required in {}", expected.join(", "), path);
        Self::new(ErrorKind::EntryKeysMissing, path, message)
    }
}

/// Counters collected while validating
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    /// Number of section values visited
    pub sections_validated: usize,
    /// Number of objects walked against a schema
    pub objects_validated: usize,
    /// Number of scalar fields checked
    pub fields_validated: usize,
    /// Errors found, including any dropped by the report cap
    pub errors_found: usize,
    /// Validation duration in milliseconds
    pub duration_ms: u64,
}

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// `true` iff no error was found, reported or not
    pub ok: bool,
    /// Errors in section order, then document order, possibly capped
    pub errors: Vec<ValidationError>,
    /// Validation statistics
    pub stats: ValidationStats,
}

impl ValidationReport {
    /// Build a report from collected errors
    ///
    /// `stats.errors_found` counts errors dropped from `errors` by a cap, so
    /// a report with an empty list can still be failed.
    pub fn from_errors(errors: Vec<ValidationError>, stats: ValidationStats) -> Self {
        Self {
            ok: errors.is_empty() && stats.errors_found == 0,
            errors,
            stats,
        }
    }

    /// Errors found but left out of `errors`
    pub fn dropped_errors(&self) -> usize {
        self.stats.errors_found.saturating_sub(self.errors.len())
    }

    /// Errors of one kind
    pub fn errors_of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |error| error.kind == kind)
    }

    /// Error descriptions joined with `"; "`, or the success message
    pub fn message(&self) -> String {
        if self.ok {
            return SUCCESS_MESSAGE.to_string();
        }

        let mut parts: Vec<String> = self.errors.iter().map(|error| error.message.clone()).collect();
        match self.dropped_errors() {
            0 => {}
            dropped if parts.is_empty() => parts.push(format!("{} errors found, none reported", dropped)),
            dropped => parts.push(format!("{} more errors not reported", dropped)),
        }
        parts.join("; ")
    }

    /// Condense into the `{status, message}` result format
    pub fn to_status(&self) -> StatusReport {
        StatusReport {
            status: if self.ok { Status::Success } else { Status::Failed },
            message: self.message(),
        }
    }
}

/// Overall status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The check passed
    Success,
    /// The check failed
    Failed,
}

/// Result returned to callers: `{"status": "success"|"failed", "message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Overall status
    pub status: Status,
    /// Success message or joined error descriptions
    pub message: String,
}

impl StatusReport {
    /// Whether the status is `success`
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::missing_required("Patient[1].PatientBk").message,
            "Missing required field: Patient[1].PatientBk"
        );
        assert_eq!(ValidationError::section_null("PatientAddress").message, "PatientAddress is null");
        assert_eq!(
            ValidationError::type_mismatch("Patient[0].BirthOrder", "int", "string").to_string(),
            "Field Patient[0].BirthOrder should be int, found string"
        );
        assert_eq!(
            ValidationError::format_mismatch("BirthTs", StringFormat::Date, "2022-13-40").message,
            "Field BirthTs should be a valid date (YYYY-MM-DD), found '2022-13-40'"
        );
    }

    #[test]
    fn test_status_report_joins_messages() {
        let report = ValidationReport::from_errors(
            vec![
                ValidationError::missing_required("Patient[0].PatientBk"),
                ValidationError::missing_array("Patient[0].PatientPhone"),
            ],
            ValidationStats::default(),
        );

        let status = report.to_status();
        assert_eq!(status.status, Status::Failed);
        assert_eq!(
            status.message,
            "Missing required field: Patient[0].PatientBk; Missing required array: Patient[0].PatientPhone"
        );
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({"status": "failed", "message": status.message})
        );
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = ValidationReport::from_errors(Vec::new(), ValidationStats::default());
        assert!(report.ok);
        assert_eq!(
            serde_json::to_value(report.to_status()).unwrap(),
            json!({"status": "success", "message": SUCCESS_MESSAGE})
        );
    }

    #[test]
    fn test_dropped_errors_keep_report_failed() {
        let stats = ValidationStats {
            errors_found: 3,
            ..ValidationStats::default()
        };

        let none_kept = ValidationReport::from_errors(Vec::new(), stats.clone());
        assert!(!none_kept.ok);
        assert_eq!(none_kept.to_status().status, Status::Failed);
        assert_eq!(none_kept.message(), "3 errors found, none reported");

        let one_kept = ValidationReport::from_errors(vec![ValidationError::missing_required("PatientBk")], stats);
        assert_eq!(
            one_kept.message(),
            "Missing required field: PatientBk; 2 more errors not reported"
        );
    }

    #[test]
    fn test_entry_keys_message() {
        let error = ValidationError::entry_keys_missing("Patient[0]", &["Info".to_string(), "Phone".to_string()]);
        assert_eq!(error.kind, ErrorKind::EntryKeysMissing);
        assert_eq!(error.message, "At least one of Info, Phone is required in Patient[0]");
    }

    #[test]
    fn test_kind_serialization() {
        let error = ValidationError::section_null("Patient[0].PatientAddress");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["kind"], json!("section-null"));
        assert_eq!(value["path"], json!("Patient[0].PatientAddress"));
    }
}

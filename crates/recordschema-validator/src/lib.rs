//! RecordSchema Validation Engine
//!
//! This crate validates healthcare-style JSON documents (Patient / Encounter
//! records) against coerced [`Schema`](recordschema_core::Schema) trees:
//! a resource type presence check gates a recursive structural walk whose
//! errors are aggregated into one [`ValidationReport`].
//!
//! ```
//! use recordschema_core::{coerce, Section};
//! use recordschema_validator::DocumentValidator;
//! use serde_json::json;
//!
//! let patient = coerce(&json!({"PatientBk": {"type": "string", "required": true}})).unwrap();
//! let validator = DocumentValidator::builder()
//!     .section(Section::Patient, patient)
//!     .build()
//!     .unwrap();
//!
//! let report = validator.validate_document(&json!({"Patient": [{"PatientBk": "A"}, {}]}));
//! assert_eq!(report.errors.len(), 1);
//! assert_eq!(report.errors[0].path, "Patient[1].PatientBk");
//! ```

pub mod error;
pub mod field;
pub mod loader;
pub mod report;
pub mod resource;
pub mod structure;
pub mod validator;

// Re-export main types for convenience
pub use error::{ConfigResult, ConfigurationError};
pub use field::FieldValidator;
pub use report::{ErrorKind, Status, StatusReport, ValidationError, ValidationReport, ValidationStats};
pub use resource::{PresenceOutcome, ResourcePresenceCheck, ResourceTypeConfig};
pub use structure::StructuralValidator;
pub use validator::{DocumentValidator, DocumentValidatorBuilder, SectionBinding};

use serde::{Deserialize, Serialize};

/// What to do after the first validation error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Record the error and keep going (default)
    #[default]
    CollectAll,
    /// Stop at the first error
    FailFast,
}

impl Policy {
    /// Whether validation stops after `new_errors` were just recorded
    pub fn stops_at(&self, new_errors: usize) -> bool {
        *self == Policy::FailFast && new_errors > 0
    }
}

/// Validation configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Error policy (default: collect all)
    pub policy: Policy,
    /// Run the resource type presence check when one is configured (default: true)
    pub check_resource_types: bool,
    /// Keep at most this many errors in a report (default: no cap)
    pub max_reported_errors: Option<usize>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            policy: Policy::CollectAll,
            check_resource_types: true,
            max_reported_errors: None,
        }
    }
}

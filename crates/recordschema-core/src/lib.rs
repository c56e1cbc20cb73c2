//! # RecordSchema Core
//!
//! Core data structures for RecordSchema: field rules, schemas, sections and
//! the type coercer that turns raw schema JSON into typed schema trees.
//!
//! ```
//! use recordschema_core::{coerce, PrimitiveType};
//! use serde_json::json;
//!
//! let schema = coerce(&json!({
//!     "PatientBk": {"type": "string", "required": true},
//!     "BirthOrder": {"type": "int"}
//! })).unwrap();
//!
//! assert_eq!(schema.get("BirthOrder").unwrap().field_type, PrimitiveType::Integer);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coerce;
pub mod error;
pub mod field;
pub mod schema;
pub mod section;

pub use coerce::coerce;
pub use error::{Error, Result};
pub use field::{value_type_name, FieldRule, PrimitiveType, StringFormat};
pub use schema::Schema;
pub use section::{Cardinality, Section};

//! Document sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// How many objects a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// A single object
    One,
    /// A sequence of objects
    Many,
}

/// A named subtree of a document governed by its own schema.
///
/// The set is closed. `Patient` and `Encounter` are top-level keys of a
/// document; `PatientAddress` and `PatientPhone` live inside each `Patient`
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    /// Patient records
    Patient,
    /// Encounter records
    Encounter,
    /// Address object of a patient
    PatientAddress,
    /// Phone entries of a patient
    PatientPhone,
}

impl Section {
    /// All sections, in validation order.
    pub const ALL: [Section; 4] = [
        Section::Patient,
        Section::Encounter,
        Section::PatientAddress,
        Section::PatientPhone,
    ];

    /// Key of the section in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Patient => "Patient",
            Section::Encounter => "Encounter",
            Section::PatientAddress => "PatientAddress",
            Section::PatientPhone => "PatientPhone",
        }
    }

    /// Section whose entries contain this one, `None` for top-level sections.
    pub fn parent(&self) -> Option<Section> {
        match self {
            Section::Patient | Section::Encounter => None,
            Section::PatientAddress | Section::PatientPhone => Some(Section::Patient),
        }
    }

    /// Whether the section is a top-level document key.
    pub fn is_top_level(&self) -> bool {
        self.parent().is_none()
    }

    /// Number of objects the section is expected to hold.
    ///
    /// Top-level sections also accept a single object in place of a sequence.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Section::PatientAddress => Cardinality::One,
            Section::Patient | Section::Encounter | Section::PatientPhone => Cardinality::Many,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownSection(s.to_string()))
    }
}

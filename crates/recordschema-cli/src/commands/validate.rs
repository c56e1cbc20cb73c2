//! Validate command implementation.

use anyhow::{Context, Result};
use clap::Args;
use recordschema_validator::{loader, Policy, ValidationReport};
use std::path::PathBuf;
use tracing::info;

use crate::config::ValidationProfile;

/// Validate a document against a validation profile
#[derive(Args)]
pub struct ValidateCommand {
    /// Validation profile file path (YAML or JSON)
    #[arg(short, long, env = "RECORDSCHEMA_PROFILE")]
    pub profile: PathBuf,

    /// Document file path to validate
    #[arg(short, long, env = "RECORDSCHEMA_DOCUMENT")]
    pub document: PathBuf,

    /// Stop at the first error
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the `{status, message}` result as JSON
    #[arg(long)]
    pub json: bool,

    /// List each error with its kind and path, plus statistics
    #[arg(long)]
    pub details: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        info!(
            "Validating {} against profile {}",
            self.document.display(),
            self.profile.display()
        );

        let report = self.run()?;
        super::print_status(&report.to_status(), self.json)?;

        if self.details {
            for error in &report.errors {
                println!("  [{}] {}: {}", error.kind, error.path, error.message);
            }
            if report.stats.errors_found > report.errors.len() {
                println!("  ... {} more", report.stats.errors_found - report.errors.len());
            }
            println!("\nValidation Statistics:");
            println!("  Sections validated: {}", report.stats.sections_validated);
            println!("  Objects validated: {}", report.stats.objects_validated);
            println!("  Fields validated: {}", report.stats.fields_validated);
            println!("  Duration: {}ms", report.stats.duration_ms);
        }

        if !report.ok {
            std::process::exit(crate::EXIT_VALIDATION_FAILED);
        }

        Ok(())
    }

    /// Load the profile and document, then validate
    pub fn run(&self) -> Result<ValidationReport> {
        let profile = ValidationProfile::load(&self.profile)
            .with_context(|| format!("Failed to load profile: {}", self.profile.display()))?;
        let policy = self.fail_fast.then_some(Policy::FailFast);
        let validator = profile
            .build_validator(policy)
            .with_context(|| "Failed to build validator from profile")?;

        let document = loader::load_document(&self.document)
            .with_context(|| format!("Failed to load document: {}", self.document.display()))?;

        Ok(validator.validate_document(&document))
    }
}

//! Resource type presence check command.

use anyhow::{Context, Result};
use clap::Args;
use recordschema_validator::{loader, PresenceOutcome, ResourcePresenceCheck};
use std::path::PathBuf;

/// Check which configured resource types a document contains
#[derive(Args)]
pub struct CheckResourcesCommand {
    /// Resource type config file path, e.g. `{"resource_type": ["Patient"]}`
    #[arg(short, long, env = "RECORDSCHEMA_RESOURCE_CONFIG")]
    pub config: PathBuf,

    /// Document file path to check
    #[arg(short, long, env = "RECORDSCHEMA_DOCUMENT")]
    pub document: PathBuf,

    /// Print the `{status, message}` result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckResourcesCommand {
    /// Execute the check-resources command
    pub fn execute(&self) -> Result<()> {
        let outcome = self.run()?;
        super::print_status(&outcome.to_status(), self.json)?;

        if !outcome.is_success() {
            std::process::exit(crate::EXIT_VALIDATION_FAILED);
        }
        Ok(())
    }

    /// Load the config and document, then run the check
    pub fn run(&self) -> Result<PresenceOutcome> {
        let config = loader::load_resource_config(&self.config)
            .with_context(|| format!("Failed to load resource type config: {}", self.config.display()))?;
        let document = loader::load_document(&self.document)
            .with_context(|| format!("Failed to load document: {}", self.document.display()))?;

        Ok(ResourcePresenceCheck::new(config).check(&document))
    }
}

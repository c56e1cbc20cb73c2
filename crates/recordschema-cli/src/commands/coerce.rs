//! Coerce command implementation.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use recordschema_validator::loader;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Output format of the coerced schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Print a schema file in its coerced, canonical form
#[derive(Args)]
pub struct CoerceCommand {
    /// Schema file path (YAML or JSON)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CoerceCommand {
    /// Execute the coerce command
    pub fn execute(&self) -> Result<()> {
        let rendered = self.render()?;

        match &self.output {
            Some(path) => {
                fs::write(path, &rendered)
                    .with_context(|| format!("Failed to write output file: {}", path.display()))?;
                info!("Wrote coerced schema to {}", path.display());
            }
            None => print!("{}", rendered),
        }
        Ok(())
    }

    /// Coerce the schema and serialize it in the requested format
    pub fn render(&self) -> Result<String> {
        let schema = loader::load_schema(&self.schema)
            .with_context(|| format!("Failed to load schema: {}", self.schema.display()))?;
        let raw = schema.to_raw()?;

        Ok(match self.format {
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&raw)?),
            OutputFormat::Yaml => serde_yaml::to_string(&raw)?,
        })
    }
}

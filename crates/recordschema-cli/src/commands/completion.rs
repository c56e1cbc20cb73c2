//! Shell completion scripts for `recordschema`.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionCommand {
    /// Execute the completion command
    pub fn execute(&self) -> Result<()> {
        match &self.output {
            Some(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("Failed to create completion file: {}", path.display()))?;
                self.render(&mut file)
            }
            None => self.render(&mut io::stdout().lock()),
        }
    }

    /// Render the script for every subcommand and flag into `out`
    pub fn render(&self, out: &mut impl Write) -> Result<()> {
        let mut cli = crate::Cli::command();
        let bin_name = cli.get_name().to_string();
        generate(self.shell, &mut cli, bin_name, out);
        out.flush()?;
        Ok(())
    }
}

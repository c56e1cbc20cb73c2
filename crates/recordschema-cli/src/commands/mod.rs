//! CLI commands module.

pub mod check_resources;
pub mod coerce;
pub mod completion;
pub mod validate;

pub use check_resources::CheckResourcesCommand;
pub use coerce::CoerceCommand;
pub use completion::CompletionCommand;
pub use validate::ValidateCommand;

use recordschema_validator::StatusReport;

/// Print a status report, as JSON or as one human-readable line
pub(crate) fn print_status(status: &StatusReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
    } else if status.is_success() {
        println!("✅ {}", status.message);
    } else {
        println!("❌ {}", status.message);
    }
    Ok(())
}

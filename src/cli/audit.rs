//! Audit log CLI commands

use clap::Subcommand;

use crate::error::LedgerResult;
use crate::storage::Storage;

/// Audit subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// Show the audit trail, most recent first
    Show {
        /// Number of records to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
}

/// Handle an audit command (read-only)
pub fn handle_audit_command(storage: &Storage, cmd: AuditCommands) -> LedgerResult<()> {
    match cmd {
        AuditCommands::Show { limit } => {
            let mut records = storage.audit().read_all()?;

            if records.is_empty() {
                println!("Audit log is empty.");
                return Ok(());
            }

            // Log order is chronological; the trail shows newest first
            records.reverse();
            for record in records.iter().take(limit) {
                println!("{}", record.format_human_readable());
            }
            println!("\nShowing {} of {} record(s)", records.len().min(limit), records.len());
        }
    }

    Ok(())
}

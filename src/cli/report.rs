//! Report CLI commands

use std::fs::File;
use std::path::PathBuf;

use chrono::Datelike;
use clap::Subcommand;

use crate::error::{LedgerError, LedgerResult};
use crate::models::ReportRange;
use crate::reports::ReportSummary;
use crate::storage::Storage;

use super::parse_date;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate the period summary report
    Summary {
        /// Start date (YYYY-MM-DD, defaults to January 1st this year)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,
        /// Also write the summary as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Also write the summary as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

/// Handle a report command (read-only; no admin token needed)
pub fn handle_report_command(storage: &Storage, cmd: ReportCommands) -> LedgerResult<()> {
    match cmd {
        ReportCommands::Summary { from, to, csv, json } => {
            // Default range: January 1st of the current year through today
            let today = chrono::Local::now().date_naive();
            let start = match from {
                Some(s) => parse_date(&s)?,
                None => ReportRange::calendar_year(today.year()).start,
            };
            let end = match to {
                Some(s) => parse_date(&s)?,
                None => today,
            };

            let summary = ReportSummary::generate(storage, start, end)?;
            println!("{}", summary.format_terminal());

            if let Some(path) = csv {
                let file = File::create(&path)
                    .map_err(|e| LedgerError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
                summary.export_csv(file)?;
                println!("CSV report written to {}", path.display());
            }

            if let Some(path) = json {
                let contents = serde_json::to_string_pretty(&summary)?;
                std::fs::write(&path, contents)
                    .map_err(|e| LedgerError::Export(format!("Failed to write {}: {}", path.display(), e)))?;
                println!("JSON report written to {}", path.display());
            }
        }
    }

    Ok(())
}

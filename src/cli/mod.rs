//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Mutating
//! commands acquire an admin token first; the passphrase comes from
//! the `--passphrase` flag, the `HEARTH_ADMIN_PASSPHRASE` environment
//! variable, or an interactive prompt.

pub mod audit;
pub mod backup;
pub mod member;
pub mod report;
pub mod transaction;

pub use audit::{handle_audit_command, AuditCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use member::{handle_member_command, MemberCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::auth::{self, AdminToken};
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;

/// Resolve a passphrase (flag/env or prompt) into an admin token
pub fn acquire_token(settings: &Settings, passphrase: Option<String>) -> LedgerResult<AdminToken> {
    let passphrase = match passphrase {
        Some(p) => p,
        None => rpassword::prompt_password("Admin passphrase: ")
            .map_err(|e| LedgerError::Io(format!("Failed to read passphrase: {}", e)))?,
    };
    auth::authorize(settings, &passphrase)
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// Parse a money amount argument
pub fn parse_amount(s: &str) -> LedgerResult<Money> {
    Money::parse(s).map_err(|e| LedgerError::Validation(e.to_string()))
}

//! Backup CLI commands

use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager, StoreKind};
use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};

use super::acquire_token;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot a store (or all stores)
    Create {
        /// Store to snapshot (transactions, members); omit for all
        store: Option<String>,
    },

    /// List snapshots, most recent first
    List {
        /// Only show snapshots of this store
        #[arg(short, long)]
        store: Option<String>,
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore a store from a snapshot
    Restore {
        /// Snapshot filename, or 'latest' together with --store
        snapshot: String,
        /// Store, required when restoring 'latest'
        #[arg(short, long)]
        store: Option<String>,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &LedgerPaths,
    settings: &Settings,
    passphrase: Option<String>,
    cmd: BackupCommands,
) -> LedgerResult<()> {
    let manager = BackupManager::new(paths.clone());

    match cmd {
        BackupCommands::Create { store } => {
            let created = match store {
                Some(s) => vec![manager.snapshot(parse_store(&s)?)?],
                None => manager.snapshot_all()?,
            };
            for info in created {
                println!("Snapshot created: {}", info.filename);
            }
        }

        BackupCommands::List { store, verbose } => {
            let store = store.as_deref().map(parse_store).transpose()?;
            let snapshots = manager.list_snapshots(store)?;

            if snapshots.is_empty() {
                println!("No snapshots found.");
                println!("Create one with: hearth backup create");
                return Ok(());
            }

            for (i, snap) in snapshots.iter().enumerate() {
                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n",
                        i + 1,
                        snap.filename,
                        snap.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(snap.size_bytes),
                    );
                } else {
                    println!("  {}. {} ({})", i + 1, snap.filename, format_size(snap.size_bytes));
                }
            }
            println!("\nTotal: {} snapshot(s)", snapshots.len());
        }

        BackupCommands::Restore {
            snapshot,
            store,
            force,
        } => {
            if !force {
                println!("WARNING: restoring will overwrite the live store!");
                println!("To proceed, run again with --force.");
                return Ok(());
            }

            let token = acquire_token(settings, passphrase)?;

            let restore = RestoreManager::new(paths.clone());
            let outcome = if snapshot.eq_ignore_ascii_case("latest") {
                let store = store
                    .as_deref()
                    .map(parse_store)
                    .transpose()?
                    .ok_or_else(|| {
                        LedgerError::Validation(
                            "--store is required when restoring 'latest'".into(),
                        )
                    })?;
                restore.restore_latest(&token, store)?
            } else {
                restore.restore(&token, &snapshot)?
            };

            println!("{}", outcome.summary());
        }
    }

    Ok(())
}

fn parse_store(s: &str) -> LedgerResult<StoreKind> {
    StoreKind::parse(s).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Unknown store '{}'; expected transactions or members",
            s
        ))
    })
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_parse_store() {
        assert!(parse_store("transactions").is_ok());
        assert!(parse_store("audit").unwrap_err().is_validation());
    }
}

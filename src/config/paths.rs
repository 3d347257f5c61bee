//! Path management for hearth-ledger
//!
//! Resolution order for the base directory:
//!
//! 1. `HEARTH_LEDGER_DATA_DIR` environment variable (if set)
//! 2. The platform data directory (e.g. `~/.local/share/hearth-ledger`
//!    on Linux, `%APPDATA%\hearth-ledger` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::LedgerError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "HEARTH_LEDGER_DATA_DIR";

/// Manages all paths used by hearth-ledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    /// Base directory for all ledger data
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Create a new LedgerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined
    /// and the environment override is not set.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            let dirs = ProjectDirs::from("", "", "hearth-ledger").ok_or_else(|| {
                LedgerError::Config("could not determine a data directory for this platform".into())
            })?;
            dirs.data_dir().to_path_buf()
        };

        Ok(Self { base_dir })
    }

    /// Create LedgerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the live stores
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory holding backup snapshots
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the append-only audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the transactions store
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to the members store
    pub fn members_file(&self) -> PathBuf {
        self.data_dir().join("members.json")
    }

    /// Ensure the base, data, and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

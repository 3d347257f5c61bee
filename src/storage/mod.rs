//! Storage layer for hearth-ledger
//!
//! JSON file stores with typed schemas and atomic whole-file replace
//! on every write. The `Storage` coordinator also owns the audit
//! logger so services can record events next to their mutations.

pub mod file_io;
pub mod init;
pub mod members;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use members::MemberRepository;
pub use transactions::TransactionRepository;

use crate::audit::{AuditLogger, AuditRecord};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Version stamped into every store file and checked on load
pub const SCHEMA_VERSION: u32 = 1;

/// Main storage coordinator providing access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub members: MemberRepository,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            members: MemberRepository::new(paths.members_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Get the audit logger (read paths)
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all stores from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.members.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all stores to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.members.save()?;
        self.transactions.save()?;
        Ok(())
    }

    /// Append an audit record, best-effort
    ///
    /// Audit failures never roll back or block the mutation they
    /// describe; they surface as a warning instead.
    pub fn record_audit(&self, record: AuditRecord) {
        if let Err(err) = self.audit.append(&record) {
            tracing::warn!(action = %record.action, %err, "failed to write audit record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        storage.load_all().unwrap();
        assert_eq!(storage.members.count().unwrap(), 0);
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_writes_both_stores() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();

        storage.save_all().unwrap();

        assert!(paths.members_file().exists());
        assert!(paths.transactions_file().exists());
    }
}

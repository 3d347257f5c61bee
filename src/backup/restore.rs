//! Snapshot restoration
//!
//! Restore validates the snapshot against the typed store schema,
//! snapshots the live store first, then atomically replaces the live
//! file and records a `restore` audit event.

use crate::audit::{AuditAction, AuditLogger, AuditRecord};
use crate::auth::AdminToken;
use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::file_io::{read_json_required, write_json_atomic};
use crate::storage::members::MembersFile;
use crate::storage::transactions::TransactionsFile;
use crate::storage::SCHEMA_VERSION;

use super::manager::{BackupManager, SnapshotInfo, StoreKind};

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreOutcome {
    /// Which store was restored
    pub store: StoreKind,
    /// Filename of the restored snapshot
    pub snapshot: String,
    /// Number of rows now in the live store
    pub rows_restored: usize,
    /// Safety snapshot of the pre-restore state
    pub pre_restore_snapshot: String,
}

impl RestoreOutcome {
    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        format!(
            "Restored {} store from {} ({} rows); previous state saved as {}",
            self.store, self.snapshot, self.rows_restored, self.pre_restore_snapshot
        )
    }
}

/// Handles restoring stores from snapshots
pub struct RestoreManager {
    paths: LedgerPaths,
    manager: BackupManager,
    audit: AuditLogger,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: LedgerPaths) -> Self {
        let manager = BackupManager::new(paths.clone());
        let audit = AuditLogger::new(paths.audit_log());
        Self {
            paths,
            manager,
            audit,
        }
    }

    /// Restore a store from the named snapshot
    ///
    /// Fails with a not-found error if the snapshot does not exist and
    /// a schema error if it does not parse as the typed store.
    pub fn restore(&self, _token: &AdminToken, filename: &str) -> LedgerResult<RestoreOutcome> {
        let info = self
            .manager
            .get(filename)?
            .ok_or_else(|| LedgerError::snapshot_not_found(filename))?;

        let outcome = self.restore_snapshot(&info)?;

        // Best-effort audit; a failed write must not fail the restore
        let record = AuditRecord::new(
            AuditAction::Restore,
            &outcome.snapshot,
            format!("{} store restored ({} rows)", outcome.store, outcome.rows_restored),
        );
        if let Err(err) = self.audit.append(&record) {
            tracing::warn!(%err, "failed to write restore audit record");
        }

        Ok(outcome)
    }

    /// Restore the most recent snapshot of a store
    pub fn restore_latest(
        &self,
        token: &AdminToken,
        store: StoreKind,
    ) -> LedgerResult<RestoreOutcome> {
        let info = self
            .manager
            .latest(store)?
            .ok_or_else(|| LedgerError::snapshot_not_found("latest"))?;
        self.restore(token, &info.filename)
    }

    fn restore_snapshot(&self, info: &SnapshotInfo) -> LedgerResult<RestoreOutcome> {
        // Validate the snapshot as a typed store before touching the
        // live file, and count the rows being restored
        let rows_restored = match info.store {
            StoreKind::Transactions => {
                let file: TransactionsFile = read_json_required(&info.path)?;
                check_schema_version(file.schema_version, &info.filename)?;
                file.transactions.len()
            }
            StoreKind::Members => {
                let file: MembersFile = read_json_required(&info.path)?;
                check_schema_version(file.schema_version, &info.filename)?;
                file.members.len()
            }
        };

        // Safety copy of the current state
        let pre_restore = self.manager.snapshot(info.store)?;

        // Atomic replace of the live store
        let live = info.store.live_path(&self.paths);
        match info.store {
            StoreKind::Transactions => {
                let file: TransactionsFile = read_json_required(&info.path)?;
                write_json_atomic(&live, &file)?;
            }
            StoreKind::Members => {
                let file: MembersFile = read_json_required(&info.path)?;
                write_json_atomic(&live, &file)?;
            }
        }

        Ok(RestoreOutcome {
            store: info.store,
            snapshot: info.filename.clone(),
            rows_restored,
            pre_restore_snapshot: pre_restore.filename,
        })
    }
}

fn check_schema_version(version: u32, filename: &str) -> LedgerResult<()> {
    if version != SCHEMA_VERSION {
        return Err(LedgerError::Schema(format!(
            "snapshot {} has schema version {}, expected {}",
            filename, version, SCHEMA_VERSION
        )));
    }
    Ok(())
}

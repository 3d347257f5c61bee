//! Snapshot creation and listing
//!
//! Each snapshot is an immutable copy of one store, named by store and
//! creation timestamp. There is no retention policy: snapshots
//! accumulate until the user removes them.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::file_io::write_json_atomic;
use crate::storage::members::MembersFile;
use crate::storage::transactions::TransactionsFile;

/// The store a snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Transactions,
    Members,
}

impl StoreKind {
    /// All stores, in snapshot order
    pub const ALL: [StoreKind; 2] = [Self::Transactions, Self::Members];

    /// Filename prefix for snapshots of this store
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Members => "members",
        }
    }

    /// Path of the live store file
    pub fn live_path(&self, paths: &LedgerPaths) -> PathBuf {
        match self {
            Self::Transactions => paths.transactions_file(),
            Self::Members => paths.members_file(),
        }
    }

    /// Parse a store kind from user input or a filename prefix
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "transactions" | "transaction" | "txn" => Some(Self::Transactions),
            "members" | "member" => Some(Self::Members),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Metadata about one snapshot
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Snapshot filename (the BackupId)
    pub filename: String,
    /// Full path to the snapshot file
    pub path: PathBuf,
    /// Which store this snapshot copies
    pub store: StoreKind,
    /// When the snapshot was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Creates and lists snapshots
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: LedgerPaths,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: LedgerPaths) -> Self {
        let backup_dir = paths.backup_dir();
        Self { backup_dir, paths }
    }

    /// Snapshot one store to a new timestamp-named file
    ///
    /// An absent live store snapshots as an empty typed store, so a
    /// restore of the snapshot reproduces the state faithfully.
    pub fn snapshot(&self, store: StoreKind) -> LedgerResult<SnapshotInfo> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "{}-{}-{:03}.json",
            store.prefix(),
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let snapshot_path = self.backup_dir.join(&filename);

        let live = store.live_path(&self.paths);
        if live.exists() {
            fs::copy(&live, &snapshot_path)
                .map_err(|e| LedgerError::Io(format!("Failed to write snapshot: {}", e)))?;
        } else {
            match store {
                StoreKind::Transactions => {
                    write_json_atomic(&snapshot_path, &TransactionsFile::default())?
                }
                StoreKind::Members => write_json_atomic(&snapshot_path, &MembersFile::default())?,
            }
        }

        let size_bytes = fs::metadata(&snapshot_path).map(|m| m.len()).unwrap_or(0);
        tracing::debug!(%filename, "snapshot created");

        Ok(SnapshotInfo {
            filename,
            path: snapshot_path,
            store,
            created_at: now,
            size_bytes,
        })
    }

    /// Snapshot every store
    pub fn snapshot_all(&self) -> LedgerResult<Vec<SnapshotInfo>> {
        StoreKind::ALL.iter().map(|s| self.snapshot(*s)).collect()
    }

    /// List snapshots, most recent first
    ///
    /// Pass a store to filter; None lists all stores.
    pub fn list_snapshots(&self, store: Option<StoreKind>) -> LedgerResult<Vec<SnapshotInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| LedgerError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_snapshot_info(&path) {
                    if store.map_or(true, |s| s == info.store) {
                        snapshots.push(info);
                    }
                }
            }
        }

        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(snapshots)
    }

    /// Get the most recent snapshot of a store
    pub fn latest(&self, store: StoreKind) -> LedgerResult<Option<SnapshotInfo>> {
        Ok(self.list_snapshots(Some(store))?.into_iter().next())
    }

    /// Look up a snapshot by filename
    pub fn get(&self, filename: &str) -> LedgerResult<Option<SnapshotInfo>> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_snapshot_info(&path))
        } else {
            Ok(None)
        }
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }
}

/// Parse snapshot metadata from a filename like
/// `transactions-20240801-153000-123.json`
fn parse_snapshot_info(path: &Path) -> Option<SnapshotInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stem = filename.strip_suffix(".json")?;

    let store = StoreKind::ALL
        .into_iter()
        .find(|s| stem.starts_with(&format!("{}-", s.prefix())))?;
    let date_part = &stem[store.prefix().len() + 1..];

    let created_at = parse_snapshot_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(SnapshotInfo {
        filename,
        path: path.to_path_buf(),
        store,
        created_at,
        size_bytes,
    })
}

/// Parse the `YYYYMMDD-HHMMSS[-mmm]` part of a snapshot filename
fn parse_snapshot_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = if parts.len() == 3 {
        parts[2].parse().unwrap_or(0)
    } else {
        0
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}

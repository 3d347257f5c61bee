//! Storage initialization
//!
//! First-run setup: directories plus empty versioned store files, so
//! later loads never have to guess at a missing schema.

use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;

use super::file_io::write_json_atomic;
use super::members::MembersFile;
use super::transactions::TransactionsFile;

/// Initialize storage for a fresh installation
pub fn initialize_storage(paths: &LedgerPaths) -> LedgerResult<()> {
    paths.ensure_directories()?;

    if !paths.transactions_file().exists() {
        write_json_atomic(paths.transactions_file(), &TransactionsFile::default())?;
    }

    if !paths.members_file().exists() {
        write_json_atomic(paths.members_file(), &MembersFile::default())?;
    }

    tracing::info!(base_dir = %paths.base_dir().display(), "storage initialized");
    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.transactions_file().exists() || !paths.members_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_empty_stores() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));

        assert!(paths.transactions_file().exists());
        assert!(paths.members_file().exists());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();
        initialize_storage(&paths).unwrap();

        assert!(paths.transactions_file().exists());
    }
}

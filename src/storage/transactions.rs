//! Transaction log repository
//!
//! Rows are keyed by their stable TransactionId and indexed by member
//! name for the common filtered views.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{Transaction, TransactionId, TransactionKind};

use super::file_io::{read_json, write_json_atomic};
use super::SCHEMA_VERSION;

/// On-disk shape of the transactions store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsFile {
    pub schema_version: u32,
    pub transactions: Vec<Transaction>,
}

impl Default for TransactionsFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            transactions: Vec::new(),
        }
    }
}

/// Repository for transaction persistence with a member-name index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    by_member: RwLock<HashMap<String, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_member: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the member index
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionsFile = read_json(&self.path)?;

        if file_data.schema_version != SCHEMA_VERSION {
            return Err(LedgerError::Schema(format!(
                "transactions store has schema version {}, expected {}",
                file_data.schema_version, SCHEMA_VERSION
            )));
        }

        let mut data = self.data_write()?;
        let mut by_member = self.index_write()?;

        data.clear();
        by_member.clear();

        for txn in file_data.transactions {
            by_member.entry(txn.member.clone()).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk (whole-table atomic replace)
    ///
    /// Rows are written oldest-first by date so the file diffs cleanly.
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.data_read()?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        let file_data = TransactionsFile {
            schema_version: SCHEMA_VERSION,
            transactions,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a transaction by id
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        Ok(self.data_read()?.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.data_read()?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    /// Get transactions for a member, newest first
    pub fn get_by_member(&self, member: &str) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.data_read()?;
        let by_member = self.index_read()?;

        let ids = by_member.get(member).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Get transactions of one kind
    pub fn get_by_kind(&self, kind: TransactionKind) -> Result<Vec<Transaction>, LedgerError> {
        let mut transactions: Vec<_> = self
            .data_read()?
            .values()
            .filter(|t| t.kind == kind)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Get transactions whose date lies in `[start, end]`, both
    /// boundaries inclusive
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let all = self.get_all()?;
        Ok(all
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), LedgerError> {
        let mut data = self.data_write()?;
        let mut by_member = self.index_write()?;

        // Drop the old index entry if the member changed
        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_member.get_mut(&old.member) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_member.entry(txn.member.clone()).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning whether it existed
    pub fn delete(&self, id: TransactionId) -> Result<bool, LedgerError> {
        let mut data = self.data_write()?;
        let mut by_member = self.index_write()?;

        if let Some(txn) = data.remove(&id) {
            if let Some(ids) = by_member.get_mut(&txn.member) {
                ids.retain(|&tid| tid != id);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.data_read()?.len())
    }

    fn data_read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<TransactionId, Transaction>>, LedgerError>
    {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn data_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<TransactionId, Transaction>>, LedgerError>
    {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn index_read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Vec<TransactionId>>>, LedgerError>
    {
        self.by_member
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn index_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<TransactionId>>>, LedgerError>
    {
        self.by_member
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let txn = Transaction::new(
            d(2024, 1, 5),
            "Alice",
            TransactionKind::Deposit,
            Money::from_units(500),
        );
        let id = txn.id;
        repo.upsert(txn).unwrap();

        let loaded = repo.get(id).unwrap().unwrap();
        assert_eq!(loaded.amount.cents(), 50_000);
    }

    #[test]
    fn test_get_by_member() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Transaction::new(
            d(2024, 1, 5),
            "Alice",
            TransactionKind::Deposit,
            Money::from_units(100),
        ))
        .unwrap();
        repo.upsert(Transaction::new(
            d(2024, 1, 6),
            "Alice",
            TransactionKind::Charge,
            Money::from_units(20),
        ))
        .unwrap();
        repo.upsert(Transaction::new(
            d(2024, 1, 7),
            "Bob",
            TransactionKind::Deposit,
            Money::from_units(300),
        ))
        .unwrap();

        assert_eq!(repo.get_by_member("Alice").unwrap().len(), 2);
        assert_eq!(repo.get_by_member("Bob").unwrap().len(), 1);
        assert!(repo.get_by_member("Carol").unwrap().is_empty());
    }

    #[test]
    fn test_upsert_reindexes_on_member_change() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut txn = Transaction::new(
            d(2024, 1, 5),
            "Alice",
            TransactionKind::Deposit,
            Money::from_units(100),
        );
        repo.upsert(txn.clone()).unwrap();

        txn.member = "Bob".to_string();
        repo.upsert(txn).unwrap();

        assert!(repo.get_by_member("Alice").unwrap().is_empty());
        assert_eq!(repo.get_by_member("Bob").unwrap().len(), 1);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        for (date, cents) in [
            (d(2024, 1, 1), 100),
            (d(2024, 1, 15), 200),
            (d(2024, 1, 31), 300),
            (d(2024, 2, 1), 400),
        ] {
            repo.upsert(Transaction::new(
                date,
                "Alice",
                TransactionKind::Deposit,
                Money::from_cents(cents),
            ))
            .unwrap();
        }

        let range = repo.get_by_date_range(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
        assert_eq!(range.len(), 3);
        assert!(range.iter().all(|t| t.date < d(2024, 2, 1)));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let txn = Transaction::new(
            d(2024, 1, 5),
            "Alice",
            TransactionKind::Deposit,
            Money::from_units(500),
        );
        let id = txn.id;
        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert!(repo2.get(id).unwrap().is_some());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let txn = Transaction::new(
            d(2024, 1, 5),
            "Alice",
            TransactionKind::Deposit,
            Money::from_units(500),
        );
        let id = txn.id;
        repo.upsert(txn).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_by_member("Alice").unwrap().is_empty());
    }

    #[test]
    fn test_get_by_kind() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Transaction::new(
            d(2024, 1, 5),
            "Alice",
            TransactionKind::MmfTransfer,
            Money::from_units(1000),
        ))
        .unwrap();
        repo.upsert(Transaction::new(
            d(2024, 1, 6),
            "Bob",
            TransactionKind::Deposit,
            Money::from_units(50),
        ))
        .unwrap();

        let pooled = repo.get_by_kind(TransactionKind::MmfTransfer).unwrap();
        assert_eq!(pooled.len(), 1);
        assert_eq!(pooled[0].member, "Alice");
    }
}

//! Transaction service
//!
//! Business logic for the transaction log: validated entry, id-addressed
//! update and delete with pre-destructive snapshots, filtered listing,
//! and audit events for every mutation.

use chrono::{NaiveDate, Utc};

use crate::audit::{generate_diff, AuditAction, AuditRecord};
use crate::auth::AdminToken;
use crate::backup::{BackupManager, StoreKind};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction, TransactionId, TransactionKind};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    backups: BackupManager,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct AddTransactionInput {
    pub date: NaiveDate,
    pub member: String,
    pub kind: TransactionKind,
    pub amount: Money,
    pub comment: Option<String>,
}

/// Field-wise patch for an existing transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub member: Option<String>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub comment: Option<String>,
}

impl TransactionPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.member.is_none()
            && self.kind.is_none()
            && self.amount.is_none()
            && self.comment.is_none()
    }
}

/// Options for filtering transaction listings
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub member: Option<String>,
    pub kind: Option<TransactionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by member name
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Filter by transaction kind
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by inclusive date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        let backups = BackupManager::new(storage.paths().clone());
        Self { storage, backups }
    }

    /// Append a validated transaction to the log
    ///
    /// Fails closed: nothing is persisted unless every check passes.
    pub fn add(&self, _token: &AdminToken, input: AddTransactionInput) -> LedgerResult<Transaction> {
        let mut txn = Transaction::new(input.date, input.member, input.kind, input.amount);
        if let Some(comment) = input.comment {
            txn.comment = comment;
        }

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        // Member references must exist at entry
        if !self.storage.members.contains(&txn.member)? {
            return Err(LedgerError::member_not_found(&txn.member));
        }

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.record_audit(AuditRecord::new(
            AuditAction::TransactionAdded,
            txn.id.full(),
            format!("{} {} {} on {}", txn.member, txn.kind, txn.amount, txn.date),
        ));

        tracing::debug!(id = %txn.id, "transaction added");
        Ok(txn)
    }

    /// Get a transaction by id
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// List transactions with optional filtering, newest first
    pub fn list(&self, filter: TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = if let Some(member) = &filter.member {
            self.storage.transactions.get_by_member(member)?
        } else if let Some(kind) = filter.kind {
            self.storage.transactions.get_by_kind(kind)?
        } else {
            self.storage.transactions.get_all()?
        };

        if let Some(kind) = filter.kind {
            transactions.retain(|t| t.kind == kind);
        }
        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.date <= end);
        }
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Apply a field-wise patch to a transaction
    pub fn update(
        &self,
        _token: &AdminToken,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> LedgerResult<Transaction> {
        let before = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.full()))?;

        let mut txn = before.clone();

        if let Some(date) = patch.date {
            txn.date = date;
        }
        if let Some(member) = patch.member {
            txn.member = member;
        }
        if let Some(kind) = patch.kind {
            txn.kind = kind;
        }
        if let Some(amount) = patch.amount {
            txn.amount = amount;
        }
        if let Some(comment) = patch.comment {
            txn.comment = comment;
        }

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if txn.member != before.member && !self.storage.members.contains(&txn.member)? {
            return Err(LedgerError::member_not_found(&txn.member));
        }

        txn.updated_at = Utc::now();

        // Safety snapshot before rewriting the table
        self.backups.snapshot(StoreKind::Transactions)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        let diff = diff_of(&before, &txn)?;
        self.storage.record_audit(AuditRecord::with_diff(
            AuditAction::TransactionUpdated,
            txn.id.full(),
            format!("{} {} {} on {}", txn.member, txn.kind, txn.amount, txn.date),
            diff,
        ));

        Ok(txn)
    }

    /// Delete a transaction by its unique id
    pub fn delete(&self, _token: &AdminToken, id: TransactionId) -> LedgerResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.full()))?;

        // Safety snapshot before the destructive write
        self.backups.snapshot(StoreKind::Transactions)?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.record_audit(AuditRecord::new(
            AuditAction::TransactionDeleted,
            txn.id.full(),
            format!("{} {} {} on {}", txn.member, txn.kind, txn.amount, txn.date),
        ));

        Ok(txn)
    }

    /// Count transactions
    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.transactions.count()
    }
}

fn diff_of(before: &Transaction, after: &Transaction) -> LedgerResult<Option<String>> {
    let before = serde_json::to_value(before)?;
    let after = serde_json::to_value(after)?;
    Ok(generate_diff(&before, &after))
}

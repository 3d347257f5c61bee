//! Balance derivation
//!
//! Balances are pure functions of the transaction log, never stored:
//! deposits and interest credit a member, withdrawals and charges
//! debit them, and MMF transfers accumulate in a separate pooled
//! total that belongs to no individual member.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, TransactionKind};
use crate::storage::Storage;

/// Derived per-member position
#[derive(Debug, Clone, PartialEq)]
pub struct MemberBalance {
    pub member: String,
    pub target: Money,
    pub deposits: Money,
    pub interest: Money,
    pub withdrawals: Money,
    pub charges: Money,
}

impl MemberBalance {
    fn new(member: String, target: Money) -> Self {
        Self {
            member,
            target,
            deposits: Money::zero(),
            interest: Money::zero(),
            withdrawals: Money::zero(),
            charges: Money::zero(),
        }
    }

    /// Running balance: deposits + interest − withdrawals − charges
    pub fn balance(&self) -> Money {
        self.deposits + self.interest - self.withdrawals - self.charges
    }

    /// Progress toward the savings target, if one is set
    pub fn target_progress(&self) -> Option<f64> {
        if self.target.is_zero() {
            return None;
        }
        Some(self.balance().cents() as f64 / self.target.cents() as f64 * 100.0)
    }
}

/// Read-only balance queries over the stores
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    /// Create a new balance service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Derive the balance for one member
    pub fn balance_for(&self, name: &str) -> LedgerResult<MemberBalance> {
        let member = self
            .storage
            .members
            .get(name)?
            .ok_or_else(|| LedgerError::member_not_found(name))?;

        let mut balance = MemberBalance::new(member.name, member.target);
        for txn in self.storage.transactions.get_by_member(name)? {
            tally(&mut balance, txn.kind, txn.amount);
        }

        Ok(balance)
    }

    /// Derive balances for every registered member, sorted by name
    ///
    /// Members with no activity appear with all-zero totals.
    pub fn all_balances(&self) -> LedgerResult<Vec<MemberBalance>> {
        self.storage
            .members
            .get_all()?
            .into_iter()
            .map(|m| self.balance_for(&m.name))
            .collect()
    }

    /// Total of the pooled money-market fund
    pub fn mmf_pool(&self) -> LedgerResult<Money> {
        Ok(self
            .storage
            .transactions
            .get_by_kind(TransactionKind::MmfTransfer)?
            .into_iter()
            .map(|t| t.amount)
            .sum())
    }
}

fn tally(balance: &mut MemberBalance, kind: TransactionKind, amount: Money) {
    match kind {
        TransactionKind::Deposit => balance.deposits += amount,
        TransactionKind::Interest => balance.interest += amount,
        TransactionKind::Withdrawal => balance.withdrawals += amount,
        TransactionKind::Charge => balance.charges += amount,
        // Pooled; not attributed to the member
        TransactionKind::MmfTransfer => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Member, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_txn(storage: &Storage, member: &str, kind: TransactionKind, cents: i64) {
        storage
            .transactions
            .upsert(Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                member,
                kind,
                Money::from_cents(cents),
            ))
            .unwrap();
    }

    #[test]
    fn test_balance_formula() {
        let (_temp_dir, storage) = create_test_storage();
        storage.members.upsert(Member::new("Alice", Money::zero())).unwrap();

        add_txn(&storage, "Alice", TransactionKind::Deposit, 50_000);
        add_txn(&storage, "Alice", TransactionKind::Interest, 1_500);
        add_txn(&storage, "Alice", TransactionKind::Withdrawal, 20_000);
        add_txn(&storage, "Alice", TransactionKind::Charge, 500);

        let service = BalanceService::new(&storage);
        let balance = service.balance_for("Alice").unwrap();

        assert_eq!(balance.deposits.cents(), 50_000);
        assert_eq!(balance.interest.cents(), 1_500);
        assert_eq!(balance.withdrawals.cents(), 20_000);
        assert_eq!(balance.charges.cents(), 500);
        assert_eq!(balance.balance().cents(), 31_000);
    }

    #[test]
    fn test_mmf_excluded_from_member_balance() {
        let (_temp_dir, storage) = create_test_storage();
        storage.members.upsert(Member::new("Alice", Money::zero())).unwrap();

        add_txn(&storage, "Alice", TransactionKind::Deposit, 10_000);
        add_txn(&storage, "Alice", TransactionKind::MmfTransfer, 99_000);

        let service = BalanceService::new(&storage);
        let balance = service.balance_for("Alice").unwrap();
        assert_eq!(balance.balance().cents(), 10_000);

        assert_eq!(service.mmf_pool().unwrap().cents(), 99_000);
    }

    #[test]
    fn test_target_progress() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .members
            .upsert(Member::new("Alice", Money::from_units(1000)))
            .unwrap();
        add_txn(&storage, "Alice", TransactionKind::Deposit, 50_000);

        let service = BalanceService::new(&storage);
        let balance = service.balance_for("Alice").unwrap();
        assert_eq!(balance.target_progress(), Some(50.0));
    }

    #[test]
    fn test_no_target_means_no_progress() {
        let (_temp_dir, storage) = create_test_storage();
        storage.members.upsert(Member::new("Bob", Money::zero())).unwrap();

        let service = BalanceService::new(&storage);
        assert_eq!(service.balance_for("Bob").unwrap().target_progress(), None);
    }

    #[test]
    fn test_all_balances_includes_inactive_members() {
        let (_temp_dir, storage) = create_test_storage();
        storage.members.upsert(Member::new("Alice", Money::zero())).unwrap();
        storage.members.upsert(Member::new("Bob", Money::zero())).unwrap();
        add_txn(&storage, "Alice", TransactionKind::Deposit, 10_000);

        let service = BalanceService::new(&storage);
        let balances = service.all_balances().unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].member, "Alice");
        assert_eq!(balances[1].member, "Bob");
        assert!(balances[1].balance().is_zero());
    }

    #[test]
    fn test_unknown_member_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BalanceService::new(&storage);
        assert!(service.balance_for("Nobody").unwrap_err().is_not_found());
    }
}

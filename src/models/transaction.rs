//! Transaction model
//!
//! A transaction is one dated ledger row: a member name, a kind, and a
//! non-negative amount whose direction is implied by the kind.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// The category of a ledger entry
///
/// Deposit and Interest credit a member's balance, Withdrawal and
/// Charge debit it. MmfTransfer moves money into the pooled
/// money-market fund and is not attributed to any per-member balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Charge,
    Interest,
    MmfTransfer,
}

impl TransactionKind {
    /// All kinds, in display order
    pub const ALL: [TransactionKind; 5] = [
        Self::Deposit,
        Self::Withdrawal,
        Self::Charge,
        Self::Interest,
        Self::MmfTransfer,
    ];

    /// True for kinds tracked in the pooled fund rather than per member
    pub fn is_pooled(&self) -> bool {
        matches!(self, Self::MmfTransfer)
    }

    /// Sign of this kind's contribution to a member balance
    /// (+1 credit, -1 debit, 0 pooled)
    pub fn balance_sign(&self) -> i64 {
        match self {
            Self::Deposit | Self::Interest => 1,
            Self::Withdrawal | Self::Charge => -1,
            Self::MmfTransfer => 0,
        }
    }

    /// Parse a kind from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Self::Deposit),
            "withdrawal" | "withdraw" => Some(Self::Withdrawal),
            "charge" => Some(Self::Charge),
            "interest" => Some(Self::Interest),
            "mmf" | "mmf_transfer" | "mmf-transfer" => Some(Self::MmfTransfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::Charge => write!(f, "Charge"),
            Self::Interest => write!(f, "Interest"),
            Self::MmfTransfer => write!(f, "MMF Transfer"),
        }
    }
}

/// A ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable unique identifier, assigned at creation
    pub id: TransactionId,

    /// Calendar date of the transaction
    pub date: NaiveDate,

    /// Name of the member this row belongs to
    pub member: String,

    /// Entry category
    pub kind: TransactionKind,

    /// Amount, non-negative at entry; direction comes from `kind`
    pub amount: Money,

    /// Free-form note
    #[serde(default)]
    pub comment: String,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        date: NaiveDate,
        member: impl Into<String>,
        kind: TransactionKind,
        amount: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date,
            member: member.into(),
            kind,
            amount,
            comment: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a transaction with a comment
    pub fn with_comment(
        date: NaiveDate,
        member: impl Into<String>,
        kind: TransactionKind,
        amount: Money,
        comment: impl Into<String>,
    ) -> Self {
        let mut txn = Self::new(date, member, kind, amount);
        txn.comment = comment.into();
        txn
    }

    /// This row's contribution to its member's balance
    /// (zero for pooled-fund rows)
    pub fn balance_effect(&self) -> Money {
        Money::from_cents(self.amount.cents() * self.kind.balance_sign())
    }

    /// Validate the entry-boundary constraints
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }
        if self.member.trim().is_empty() {
            return Err(TransactionValidationError::EmptyMember);
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.member,
            self.kind,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    EmptyMember,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(a) => write!(f, "Amount may not be negative ({})", a),
            Self::EmptyMember => write!(f, "Member name is required"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let txn = Transaction::new(date, "Alice", TransactionKind::Deposit, Money::from_units(500));

        assert_eq!(txn.member, "Alice");
        assert_eq!(txn.kind, TransactionKind::Deposit);
        assert_eq!(txn.amount.cents(), 50_000);
        assert!(txn.comment.is_empty());
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_balance_effect_signs() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let amount = Money::from_units(100);

        let deposit = Transaction::new(date, "A", TransactionKind::Deposit, amount);
        assert_eq!(deposit.balance_effect(), amount);

        let interest = Transaction::new(date, "A", TransactionKind::Interest, amount);
        assert_eq!(interest.balance_effect(), amount);

        let withdrawal = Transaction::new(date, "A", TransactionKind::Withdrawal, amount);
        assert_eq!(withdrawal.balance_effect(), -amount);

        let charge = Transaction::new(date, "A", TransactionKind::Charge, amount);
        assert_eq!(charge.balance_effect(), -amount);

        let mmf = Transaction::new(date, "A", TransactionKind::MmfTransfer, amount);
        assert_eq!(mmf.balance_effect(), Money::zero());
        assert!(mmf.kind.is_pooled());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let txn = Transaction::new(date, "Alice", TransactionKind::Deposit, Money::from_cents(-1));
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_empty_member_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let txn = Transaction::new(date, "", TransactionKind::Deposit, Money::from_units(1));
        assert_eq!(txn.validate(), Err(TransactionValidationError::EmptyMember));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(TransactionKind::parse("deposit"), Some(TransactionKind::Deposit));
        assert_eq!(TransactionKind::parse("Withdraw"), Some(TransactionKind::Withdrawal));
        assert_eq!(TransactionKind::parse("mmf"), Some(TransactionKind::MmfTransfer));
        assert_eq!(TransactionKind::parse("dividend"), None);
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&TransactionKind::MmfTransfer).unwrap();
        assert_eq!(json, "\"mmf_transfer\"");
        let json = serde_json::to_string(&TransactionKind::Deposit).unwrap();
        assert_eq!(json, "\"deposit\"");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let txn = Transaction::with_comment(
            date,
            "Alice",
            TransactionKind::Withdrawal,
            Money::from_units(200),
            "school fees",
        );

        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, deserialized);
    }
}

//! Service layer for hearth-ledger
//!
//! Business logic on top of the storage layer: validation, audit
//! events, pre-destructive snapshots, and derived balances. Every
//! mutating call takes an `&AdminToken` (see `crate::auth`).

pub mod balance;
pub mod member;
pub mod transaction;

pub use balance::{BalanceService, MemberBalance};
pub use member::{MemberPatch, MemberService};
pub use transaction::{
    AddTransactionInput, TransactionFilter, TransactionPatch, TransactionService,
};

//! Core data models for hearth-ledger
//!
//! The domain is small: members with savings targets, dated
//! transactions against the pooled household fund, and the money and
//! date-range primitives both are built on.

pub mod ids;
pub mod member;
pub mod money;
pub mod range;
pub mod transaction;

pub use ids::TransactionId;
pub use member::Member;
pub use money::Money;
pub use range::ReportRange;
pub use transaction::{Transaction, TransactionKind};

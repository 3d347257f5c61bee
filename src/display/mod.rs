//! Terminal table rendering

pub mod member;
pub mod transaction;

pub use member::{balance_table, member_table};
pub use transaction::transaction_table;

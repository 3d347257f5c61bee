//! Transaction table formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Transaction;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

/// Render a transaction listing as a table
pub fn transaction_table(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            member: txn.member.clone(),
            kind: txn.kind.to_string(),
            amount: txn.amount.format_with_symbol(symbol),
            comment: txn.comment.clone(),
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionKind};
    use chrono::NaiveDate;

    #[test]
    fn test_empty_listing() {
        assert_eq!(transaction_table(&[], "$"), "No transactions found.");
    }

    #[test]
    fn test_table_contains_row_data() {
        let txn = Transaction::with_comment(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "Alice",
            TransactionKind::Deposit,
            Money::from_units(500),
            "January savings",
        );

        let table = transaction_table(&[txn], "$");
        assert!(table.contains("Alice"));
        assert!(table.contains("Deposit"));
        assert!(table.contains("$500.00"));
        assert!(table.contains("January savings"));
    }
}

//! Member and balance table formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Member;
use crate::services::MemberBalance;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

/// Render the member registry as a table
pub fn member_table(members: &[Member], symbol: &str) -> String {
    if members.is_empty() {
        return "No members registered.".to_string();
    }

    let rows: Vec<MemberRow> = members
        .iter()
        .map(|m| MemberRow {
            name: m.name.clone(),
            target: m.target.format_with_symbol(symbol),
            registered: m.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Deposits")]
    deposits: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Withdrawals")]
    withdrawals: String,
    #[tabled(rename = "Charges")]
    charges: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Target %")]
    progress: String,
}

/// Render derived balances as a table
pub fn balance_table(balances: &[MemberBalance], symbol: &str) -> String {
    if balances.is_empty() {
        return "No members registered.".to_string();
    }

    let rows: Vec<BalanceRow> = balances
        .iter()
        .map(|b| BalanceRow {
            name: b.member.clone(),
            deposits: b.deposits.format_with_symbol(symbol),
            interest: b.interest.format_with_symbol(symbol),
            withdrawals: b.withdrawals.format_with_symbol(symbol),
            charges: b.charges.format_with_symbol(symbol),
            balance: b.balance().format_with_symbol(symbol),
            progress: match b.target_progress() {
                Some(p) => format!("{:.1}%", p),
                None => "-".to_string(),
            },
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_empty_tables() {
        assert_eq!(member_table(&[], "$"), "No members registered.");
        assert_eq!(balance_table(&[], "$"), "No members registered.");
    }

    #[test]
    fn test_member_table_contents() {
        let members = vec![Member::new("Alice", Money::from_units(1000))];
        let table = member_table(&members, "$");
        assert!(table.contains("Alice"));
        assert!(table.contains("$1000.00"));
    }
}

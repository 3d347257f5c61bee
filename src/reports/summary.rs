//! Period summary report
//!
//! The reproducible dataset behind the rendered household report:
//! per-member totals and a monthly pivot with net flow, computed over
//! an inclusive date range. The output is deterministic for unchanged
//! data, so rendering the same range twice yields the same document.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, ReportRange, TransactionKind};
use crate::storage::Storage;

/// Per-kind totals for one grouping bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct KindTotals {
    pub deposits: Money,
    pub withdrawals: Money,
    pub charges: Money,
    pub interest: Money,
    pub mmf_transfers: Money,
}

impl KindTotals {
    fn tally(&mut self, kind: TransactionKind, amount: Money) {
        match kind {
            TransactionKind::Deposit => self.deposits += amount,
            TransactionKind::Withdrawal => self.withdrawals += amount,
            TransactionKind::Charge => self.charges += amount,
            TransactionKind::Interest => self.interest += amount,
            TransactionKind::MmfTransfer => self.mmf_transfers += amount,
        }
    }

    /// Net flow: deposits minus withdrawals, absent categories are zero
    pub fn net_flow(&self) -> Money {
        self.deposits - self.withdrawals
    }
}

/// Totals for one member over the report range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberTotals {
    pub member: String,
    #[serde(flatten)]
    pub totals: KindTotals,
}

/// Totals for one calendar month over the report range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    /// Display label, e.g. "Jan 2024"
    pub label: String,
    #[serde(flatten)]
    pub totals: KindTotals,
    pub net_flow: Money,
}

/// The structured report dataset consumed by renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Per-member totals, sorted by name; members without activity in
    /// the range are omitted
    pub members: Vec<MemberTotals>,
    /// Monthly pivot, chronological; months without activity are omitted
    pub months: Vec<MonthlySummary>,
    /// Overall totals across the whole range
    pub totals: KindTotals,
    /// Number of rows that fell in the range
    pub transaction_count: usize,
}

impl ReportSummary {
    /// Aggregate the transaction log over `[start, end]`, inclusive on
    /// both boundaries
    ///
    /// An empty range yields an empty summary, not an error.
    pub fn generate(storage: &Storage, start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        let range =
            ReportRange::new(start, end).map_err(|e| LedgerError::Validation(e.to_string()))?;

        let transactions = storage.transactions.get_by_date_range(range.start, range.end)?;

        let mut by_member: BTreeMap<String, KindTotals> = BTreeMap::new();
        let mut by_month: BTreeMap<(i32, u32), KindTotals> = BTreeMap::new();
        let mut totals = KindTotals::default();

        for txn in &transactions {
            totals.tally(txn.kind, txn.amount);
            by_member
                .entry(txn.member.clone())
                .or_default()
                .tally(txn.kind, txn.amount);
            by_month
                .entry((txn.date.year(), txn.date.month()))
                .or_default()
                .tally(txn.kind, txn.amount);
        }

        let members = by_member
            .into_iter()
            .map(|(member, totals)| MemberTotals { member, totals })
            .collect();

        let months = by_month
            .into_iter()
            .map(|((year, month), totals)| MonthlySummary {
                year,
                month,
                label: month_label(year, month),
                net_flow: totals.net_flow(),
                totals,
            })
            .collect();

        Ok(Self {
            start_date: range.start,
            end_date: range.end,
            members,
            months,
            totals,
            transaction_count: transactions.len(),
        })
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Household Report: {} to {}\n",
            self.start_date, self.end_date
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!("Transactions: {}\n", self.transaction_count));
        output.push_str(&format!("Deposits:     {}\n", self.totals.deposits));
        output.push_str(&format!("Withdrawals:  {}\n", self.totals.withdrawals));
        output.push_str(&format!("Charges:      {}\n", self.totals.charges));
        output.push_str(&format!("Interest:     {}\n", self.totals.interest));
        output.push_str(&format!("MMF pool:     {}\n", self.totals.mmf_transfers));
        output.push_str(&format!("Net flow:     {}\n", self.totals.net_flow()));

        if self.transaction_count == 0 {
            output.push_str("\nNo activity in this period.\n");
            return output;
        }

        output.push_str(&format!(
            "\n{:<20} {:>10} {:>12} {:>10} {:>10} {:>10}\n",
            "Member", "Deposits", "Withdrawals", "Charges", "Interest", "Balance"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');
        for row in &self.members {
            let t = &row.totals;
            output.push_str(&format!(
                "{:<20} {:>10} {:>12} {:>10} {:>10} {:>10}\n",
                row.member,
                t.deposits,
                t.withdrawals,
                t.charges,
                t.interest,
                t.deposits + t.interest - t.withdrawals - t.charges
            ));
        }

        output.push_str(&format!(
            "\n{:<10} {:>10} {:>12} {:>10}\n",
            "Month", "Deposits", "Withdrawals", "Net Flow"
        ));
        output.push_str(&"-".repeat(46));
        output.push('\n');
        for month in &self.months {
            output.push_str(&format!(
                "{:<10} {:>10} {:>12} {:>10}\n",
                month.label, month.totals.deposits, month.totals.withdrawals, month.net_flow
            ));
        }

        output
    }

    /// Export the summary as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        #[derive(Serialize)]
        struct CsvRow<'a> {
            scope: &'static str,
            key: &'a str,
            deposits: Money,
            withdrawals: Money,
            charges: Money,
            interest: Money,
            mmf_transfers: Money,
            net_flow: Money,
        }

        let mut writer = csv::Writer::from_writer(writer);

        for row in &self.members {
            let t = row.totals;
            writer
                .serialize(CsvRow {
                    scope: "member",
                    key: &row.member,
                    deposits: t.deposits,
                    withdrawals: t.withdrawals,
                    charges: t.charges,
                    interest: t.interest,
                    mmf_transfers: t.mmf_transfers,
                    net_flow: t.net_flow(),
                })
                .map_err(|e| LedgerError::Export(e.to_string()))?;
        }

        for month in &self.months {
            let t = month.totals;
            writer
                .serialize(CsvRow {
                    scope: "month",
                    key: &month.label,
                    deposits: t.deposits,
                    withdrawals: t.withdrawals,
                    charges: t.charges,
                    interest: t.interest,
                    mmf_transfers: t.mmf_transfers,
                    net_flow: month.net_flow,
                })
                .map_err(|e| LedgerError::Export(e.to_string()))?;
        }

        writer.flush().map_err(|e| LedgerError::Export(e.to_string()))?;
        Ok(())
    }
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first of month from a valid transaction date")
        .format("%b %Y")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Member, Transaction};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn add_txn(storage: &Storage, date: NaiveDate, member: &str, kind: TransactionKind, cents: i64) {
        storage
            .transactions
            .upsert(Transaction::new(date, member, kind, Money::from_cents(cents)))
            .unwrap();
    }

    /// Worked example: Alice deposits 500 in January, withdraws 200 in
    /// February; report over both months.
    fn setup_alice(storage: &Storage) {
        storage
            .members
            .upsert(Member::new("Alice", Money::from_units(1000)))
            .unwrap();
        add_txn(storage, d(2024, 1, 5), "Alice", TransactionKind::Deposit, 50_000);
        add_txn(storage, d(2024, 2, 10), "Alice", TransactionKind::Withdrawal, 20_000);
    }

    #[test]
    fn test_worked_example() {
        let (_temp_dir, storage) = create_test_storage();
        setup_alice(&storage);

        let summary = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 2, 28)).unwrap();

        assert_eq!(summary.transaction_count, 2);
        assert_eq!(summary.members.len(), 1);
        let alice = &summary.members[0];
        assert_eq!(alice.member, "Alice");
        assert_eq!(alice.totals.deposits.cents(), 50_000);
        assert_eq!(alice.totals.withdrawals.cents(), 20_000);

        assert_eq!(summary.months.len(), 2);
        let jan = &summary.months[0];
        assert_eq!(jan.label, "Jan 2024");
        assert_eq!(jan.totals.deposits.cents(), 50_000);
        assert_eq!(jan.net_flow.cents(), 50_000);

        let feb = &summary.months[1];
        assert_eq!(feb.label, "Feb 2024");
        assert_eq!(feb.totals.withdrawals.cents(), 20_000);
        assert_eq!(feb.net_flow.cents(), -20_000);
    }

    #[test]
    fn test_range_boundaries_inclusive() {
        let (_temp_dir, storage) = create_test_storage();
        add_txn(&storage, d(2024, 2, 28), "Alice", TransactionKind::Deposit, 100);
        add_txn(&storage, d(2024, 2, 29), "Alice", TransactionKind::Deposit, 200);

        let summary = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 2, 28)).unwrap();

        // The row dated exactly `end` is in; end + 1 day is out
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.totals.deposits.cents(), 100);
    }

    #[test]
    fn test_net_flow_with_missing_category() {
        let (_temp_dir, storage) = create_test_storage();
        add_txn(&storage, d(2024, 3, 5), "Alice", TransactionKind::Deposit, 50_000);

        let summary = ReportSummary::generate(&storage, d(2024, 3, 1), d(2024, 3, 31)).unwrap();

        assert_eq!(summary.months.len(), 1);
        assert_eq!(summary.months[0].net_flow.cents(), 50_000);
    }

    #[test]
    fn test_empty_range_yields_empty_summary() {
        let (_temp_dir, storage) = create_test_storage();

        let summary = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 12, 31)).unwrap();

        assert_eq!(summary.transaction_count, 0);
        assert!(summary.members.is_empty());
        assert!(summary.months.is_empty());
        assert!(summary.totals.net_flow().is_zero());
    }

    #[test]
    fn test_generation_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();
        setup_alice(&storage);

        let first = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 2, 28)).unwrap();
        let second = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 2, 28)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_months_without_activity_omitted() {
        let (_temp_dir, storage) = create_test_storage();
        add_txn(&storage, d(2024, 1, 5), "Alice", TransactionKind::Deposit, 100);
        add_txn(&storage, d(2024, 4, 5), "Alice", TransactionKind::Deposit, 200);

        let summary = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 12, 31)).unwrap();

        let labels: Vec<_> = summary.months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 2024", "Apr 2024"]);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let (_temp_dir, storage) = create_test_storage();

        let err =
            ReportSummary::generate(&storage, d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_mmf_tracked_separately_in_totals() {
        let (_temp_dir, storage) = create_test_storage();
        add_txn(&storage, d(2024, 1, 5), "Alice", TransactionKind::Deposit, 10_000);
        add_txn(&storage, d(2024, 1, 6), "Alice", TransactionKind::MmfTransfer, 90_000);

        let summary = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 1, 31)).unwrap();

        assert_eq!(summary.totals.mmf_transfers.cents(), 90_000);
        // MMF transfers do not move net flow
        assert_eq!(summary.totals.net_flow().cents(), 10_000);
    }

    #[test]
    fn test_csv_export() {
        let (_temp_dir, storage) = create_test_storage();
        setup_alice(&storage);

        let summary = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 2, 28)).unwrap();

        let mut buf = Vec::new();
        summary.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        assert!(csv.starts_with("scope,key,deposits"));
        assert!(csv.contains("member,Alice,50000"));
        assert!(csv.contains("month,Jan 2024,50000"));
    }

    #[test]
    fn test_terminal_format_mentions_months() {
        let (_temp_dir, storage) = create_test_storage();
        setup_alice(&storage);

        let summary = ReportSummary::generate(&storage, d(2024, 1, 1), d(2024, 2, 28)).unwrap();
        let text = summary.format_terminal();

        assert!(text.contains("Jan 2024"));
        assert!(text.contains("Feb 2024"));
        assert!(text.contains("Alice"));
    }
}

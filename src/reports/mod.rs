//! Reports for hearth-ledger
//!
//! The report aggregator produces a deterministic, serializable
//! summary dataset over a caller-supplied date range; renderers
//! (terminal, CSV, JSON) consume it without recomputing anything.

pub mod summary;

pub use summary::{KindTotals, MemberTotals, MonthlySummary, ReportSummary};

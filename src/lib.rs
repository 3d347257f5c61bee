//! hearth-ledger - Household pooled-savings ledger and report generator
//!
//! Records member contributions and withdrawals against a shared
//! household fund, tracks a pooled money-market fund, and produces
//! reproducible report datasets over arbitrary date ranges.
//!
//! # Architecture
//!
//! - `config`: path resolution and persisted settings
//! - `error`: the crate-wide error type
//! - `models`: members, transactions, money, date ranges
//! - `storage`: JSON file stores with atomic whole-file replace
//! - `audit`: append-only JSONL event log, one record per mutation
//! - `auth`: admin token gating every mutating call
//! - `backup`: per-store snapshots and atomic restore
//! - `services`: the ledger engine (validated mutations, balances)
//! - `reports`: the report aggregator
//! - `display`: terminal table rendering
//! - `cli`: clap command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_ledger::config::{paths::LedgerPaths, settings::Settings};
//! use hearth_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod auth;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};

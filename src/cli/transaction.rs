//! Transaction CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction_table;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{TransactionId, TransactionKind};
use crate::services::{AddTransactionInput, TransactionFilter, TransactionPatch, TransactionService};
use crate::storage::Storage;

use super::{acquire_token, parse_amount, parse_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Member name
        member: String,
        /// Transaction type (deposit, withdrawal, charge, interest, mmf)
        kind: String,
        /// Amount (non-negative; direction follows the type)
        amount: String,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Optional comment
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// List transactions
    List {
        /// Filter by member
        #[arg(short, long)]
        member: Option<String>,
        /// Filter by type
        #[arg(short, long)]
        kind: Option<String>,
        /// Start of date range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End of date range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Edit a transaction by id
    Update {
        /// Transaction id
        id: String,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// New member
        #[arg(long)]
        member: Option<String>,
        /// New type
        #[arg(long)]
        kind: Option<String>,
        /// New amount
        #[arg(long)]
        amount: Option<String>,
        /// New comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete a transaction by id
    Delete {
        /// Transaction id
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    passphrase: Option<String>,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            member,
            kind,
            amount,
            date,
            comment,
        } => {
            let token = acquire_token(settings, passphrase)?;

            let kind = parse_kind(&kind)?;
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => chrono::Local::now().date_naive(),
            };

            let txn = service.add(
                &token,
                AddTransactionInput {
                    date,
                    member,
                    kind,
                    amount,
                    comment,
                },
            )?;

            println!(
                "Added {}: {} {} {} on {}",
                txn.id,
                txn.member,
                txn.kind,
                txn.amount.format_with_symbol(symbol),
                txn.date
            );
        }

        TransactionCommands::List {
            member,
            kind,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(member) = member {
                filter = filter.member(member);
            }
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            if let Some(from) = from {
                filter.start_date = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(parse_date(&to)?);
            }

            let transactions = service.list(filter)?;
            println!("{}", transaction_table(&transactions, symbol));
        }

        TransactionCommands::Update {
            id,
            date,
            member,
            kind,
            amount,
            comment,
        } => {
            let token = acquire_token(settings, passphrase)?;
            let id = resolve_id(&service, &id)?;

            let patch = TransactionPatch {
                date: date.as_deref().map(parse_date).transpose()?,
                member,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                comment,
            };

            if patch.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }

            let txn = service.update(&token, id, patch)?;
            println!(
                "Updated {}: {} {} {} on {}",
                txn.id,
                txn.member,
                txn.kind,
                txn.amount.format_with_symbol(symbol),
                txn.date
            );
        }

        TransactionCommands::Delete { id } => {
            let token = acquire_token(settings, passphrase)?;
            let id = resolve_id(&service, &id)?;

            let txn = service.delete(&token, id)?;
            println!("Deleted {} ({} {} on {})", txn.id, txn.member, txn.kind, txn.date);
        }
    }

    Ok(())
}

fn parse_kind(s: &str) -> LedgerResult<TransactionKind> {
    TransactionKind::parse(s).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Unknown transaction type '{}'; expected deposit, withdrawal, charge, interest, or mmf",
            s
        ))
    })
}

/// Resolve a full or short-prefixed id (as shown in listings) to a
/// unique transaction
fn resolve_id(service: &TransactionService, s: &str) -> LedgerResult<TransactionId> {
    if let Ok(id) = s.parse::<TransactionId>() {
        return Ok(id);
    }

    let needle = s.strip_prefix("txn-").unwrap_or(s);
    let matches: Vec<TransactionId> = service
        .list(TransactionFilter::new())?
        .into_iter()
        .filter(|t| t.id.full().starts_with(needle))
        .map(|t| t.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(LedgerError::transaction_not_found(s)),
        _ => Err(LedgerError::Validation(format!(
            "Transaction id '{}' is ambiguous ({} matches)",
            s,
            matches.len()
        ))),
    }
}

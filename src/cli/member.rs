//! Member CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{balance_table, member_table};
use crate::error::LedgerResult;
use crate::models::Money;
use crate::services::{BalanceService, MemberPatch, MemberService};
use crate::storage::Storage;

use super::{acquire_token, parse_amount};

/// Member subcommands
#[derive(Subcommand)]
pub enum MemberCommands {
    /// Register a new member
    Add {
        /// Member name (unique, case-sensitive)
        name: String,
        /// Savings target (defaults to 0)
        #[arg(short, long)]
        target: Option<String>,
    },

    /// List registered members
    List,

    /// Edit a member's target or name
    Update {
        /// Current member name
        name: String,
        /// New name; historical transactions follow
        #[arg(long)]
        rename: Option<String>,
        /// New savings target
        #[arg(long)]
        target: Option<String>,
    },

    /// Show derived balances and the MMF pool
    Balances,
}

/// Handle a member command
pub fn handle_member_command(
    storage: &Storage,
    settings: &Settings,
    passphrase: Option<String>,
    cmd: MemberCommands,
) -> LedgerResult<()> {
    let service = MemberService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        MemberCommands::Add { name, target } => {
            let token = acquire_token(settings, passphrase)?;

            let target = match target {
                Some(t) => parse_amount(&t)?,
                None => Money::zero(),
            };

            let member = service.add(&token, name, target)?;
            println!(
                "Added member {} with target {}",
                member.name,
                member.target.format_with_symbol(symbol)
            );
        }

        MemberCommands::List => {
            let members = service.list()?;
            println!("{}", member_table(&members, symbol));
        }

        MemberCommands::Update {
            name,
            rename,
            target,
        } => {
            let token = acquire_token(settings, passphrase)?;

            let patch = MemberPatch {
                rename,
                target: target.as_deref().map(parse_amount).transpose()?,
            };
            let member = service.update(&token, &name, patch)?;
            println!(
                "Updated member {} (target {})",
                member.name,
                member.target.format_with_symbol(symbol)
            );
        }

        MemberCommands::Balances => {
            let balances = BalanceService::new(storage);
            let rows = balances.all_balances()?;
            println!("{}", balance_table(&rows, symbol));

            let pool = balances.mmf_pool()?;
            println!("\nMMF pool total: {}", pool.format_with_symbol(symbol));
        }
    }

    Ok(())
}

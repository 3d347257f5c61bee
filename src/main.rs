use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hearth_ledger::auth;
use hearth_ledger::cli::{
    handle_audit_command, handle_backup_command, handle_member_command, handle_report_command,
    handle_transaction_command, AuditCommands, BackupCommands, MemberCommands, ReportCommands,
    TransactionCommands,
};
use hearth_ledger::config::{paths::LedgerPaths, settings::Settings};
use hearth_ledger::error::LedgerError;
use hearth_ledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "hearth",
    version,
    about = "Household pooled-savings ledger and report generator",
    long_about = "hearth-ledger records member contributions and withdrawals \
                  against a shared household fund, tracks a pooled money-market \
                  fund, and produces period summary reports."
)]
struct Cli {
    /// Admin passphrase for mutating commands (prompted if omitted)
    #[arg(long, global = true, env = "HEARTH_ADMIN_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Member management commands
    #[command(subcommand)]
    Member(MemberCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Report generation commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Backup and restore commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Audit trail commands
    #[command(subcommand)]
    Audit(AuditCommands),

    /// Initialize the ledger and set the admin passphrase
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = LedgerPaths::new()?;

    if matches!(cli.command, Some(Commands::Init)) {
        return handle_init(&paths, cli.passphrase);
    }

    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Member(cmd)) => {
            handle_member_command(&storage, &settings, cli.passphrase, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cli.passphrase, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cli.passphrase, cmd)?;
        }
        Some(Commands::Audit(cmd)) => {
            handle_audit_command(&storage, cmd)?;
        }
        Some(Commands::Init) => unreachable!("handled above"),
        Some(Commands::Config) => {
            println!("hearth-ledger configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Currency symbol:  {}", settings.currency_symbol);
            println!("Date format:      {}", settings.date_format);
            println!(
                "Admin passphrase: {}",
                if settings.admin_passphrase_hash.is_some() {
                    "set"
                } else {
                    "not set (run 'hearth init')"
                }
            );
        }
        None => {
            println!("hearth-ledger - household pooled-savings ledger");
            println!();
            println!("Run 'hearth --help' for usage information.");
            println!("Run 'hearth init' to set up a new ledger.");
        }
    }

    Ok(())
}

fn handle_init(paths: &LedgerPaths, passphrase: Option<String>) -> Result<()> {
    println!("Initializing hearth-ledger at: {}", paths.base_dir().display());
    initialize_storage(paths)?;

    let mut settings = Settings::load_or_create(paths)?;

    if settings.admin_passphrase_hash.is_none() {
        let passphrase = match passphrase {
            Some(p) => p,
            None => {
                let first = rpassword::prompt_password("Choose an admin passphrase: ")?;
                let second = rpassword::prompt_password("Confirm admin passphrase: ")?;
                if first != second {
                    return Err(
                        LedgerError::Validation("Passphrases do not match".into()).into()
                    );
                }
                first
            }
        };
        auth::set_passphrase(&mut settings, &passphrase)?;
    }

    settings.save(paths)?;

    println!("Initialization complete.");
    println!();
    println!("Next steps:");
    println!("  hearth member add <name> --target <amount>");
    println!("  hearth transaction add <member> deposit <amount>");
    println!("  hearth report summary");
    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};

use splitbook::audit::AuditLogger;
use splitbook::cli::{
    handle_balance_command, handle_clear_command, handle_config_command, handle_expense_command,
    handle_export_command, handle_history_command, handle_ledgers_command, handle_person_command,
    handle_settle_command, BalanceArgs, ConfigCommands, ExpenseCommands, ExportArgs,
    PersonCommands, SettleCommands,
};
use splitbook::config::{paths::SplitbookPaths, settings::Settings};
use splitbook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "splitbook",
    version,
    about = "Split shared expenses and work out who pays whom",
    long_about = "splitbook keeps a ledger of shared expenses for a group of people. \
                  Record who paid for what, split it equally, by exact amounts or by \
                  percentage, and get the list of payments that settles everyone up."
)]
struct Cli {
    /// Ledger to use (defaults to the configured default ledger)
    #[arg(long, global = true, env = "SPLITBOOK_LEDGER")]
    ledger: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the people in the ledger
    #[command(subcommand, alias = "people")]
    Person(PersonCommands),

    /// Record and inspect expenses
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Show balances and who pays whom
    Balance(BalanceArgs),

    /// Mark suggested payments as paid
    #[command(subcommand)]
    Settle(SettleCommands),

    /// Export the ledger as JSON, YAML or CSV
    Export(ExportArgs),

    /// Remove every person and expense from the ledger
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// List ledgers
    Ledgers,

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Include every ledger, not just the active one
        #[arg(long)]
        all: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = SplitbookPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let ledger = cli
        .ledger
        .clone()
        .unwrap_or_else(|| settings.default_ledger.clone());

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("splitbook - split shared expenses");
            println!();
            println!("Run 'splitbook --help' for usage information.");
            return Ok(());
        }
    };

    // Commands that don't touch a ledger's data
    match command {
        Commands::Config { command } => {
            handle_config_command(&paths, &mut settings, &ledger, command)?;
            return Ok(());
        }
        Commands::Ledgers => {
            handle_ledgers_command(&paths, &ledger)?;
            return Ok(());
        }
        Commands::History { limit, all } => {
            let filter = if all { None } else { Some(ledger.as_str()) };
            handle_history_command(&paths, filter, limit)?;
            return Ok(());
        }
        _ => {}
    }

    // Initialize storage
    let mut storage = Storage::open(&paths, &ledger)?;
    if settings.audit_enabled {
        storage = storage.with_audit(AuditLogger::new(paths.audit_log()));
    }
    storage.load_all()?;

    match command {
        Commands::Person(cmd) => handle_person_command(&storage, &settings, cmd)?,
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, cmd)?,
        Commands::Balance(args) => handle_balance_command(&storage, &settings, args)?,
        Commands::Settle(cmd) => handle_settle_command(&storage, &settings, cmd)?,
        Commands::Export(args) => handle_export_command(&storage, args)?,
        Commands::Clear { force } => handle_clear_command(&storage, force)?,
        Commands::Config { .. } | Commands::Ledgers | Commands::History { .. } => {}
    }

    Ok(())
}

//! Balance CLI command

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::config::settings::Settings;
use crate::display::{format_balance_report, format_settlements, format_summary};
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{BalanceTotal, CategoryTotal, SettlementStatus};
use crate::services::SettlementService;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Arguments for `balance`
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Only print who pays whom
    #[arg(long)]
    pub settlements: bool,

    /// Print a plain-text summary to share with the group
    #[arg(long, conflicts_with_all = ["settlements", "format"])]
    pub summary: bool,
}

/// The report as printed by `--format json`, with paid flags on settlements
#[derive(Serialize)]
struct ReportJson<'a> {
    totals: &'a [BalanceTotal],
    settlements: &'a [SettlementStatus],
    by_category: &'a [CategoryTotal],
}

/// Handle the balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    args: BalanceArgs,
) -> SplitbookResult<()> {
    let (report, statuses) = SettlementService::new(storage).report()?;
    let symbol = &settings.currency_symbol;

    if args.summary {
        println!("{}", format_summary(&report, &statuses, storage.ledger(), symbol));
        return Ok(());
    }

    match (args.format, args.settlements) {
        (OutputFormat::Table, false) => {
            println!("{}", format_balance_report(&report, &statuses, symbol))
        }
        (OutputFormat::Table, true) => {
            println!("{}", format_settlements(&report, &statuses, symbol))
        }
        (OutputFormat::Json, false) => println!(
            "{}",
            to_json(&ReportJson {
                totals: &report.totals,
                settlements: &statuses,
                by_category: &report.by_category,
            })?
        ),
        (OutputFormat::Json, true) => println!("{}", to_json(&statuses)?),
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> SplitbookResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| SplitbookError::Json(e.to_string()))
}

//! Expense CLI commands
//!
//! `--share` takes `NAME` for equal splits and `NAME=VALUE` for exact
//! (`Ana=12.50`) or percent (`Ana=40`) splits. Without any `--share` the
//! expense is split equally among everyone in the ledger.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Money, Participant, Percent, ShareInput, SplitMode};
use crate::services::{ExpenseService, NewExpense, ParticipantService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What was paid for
        description: String,
        /// Total amount (e.g. 42.50)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Who paid (name or ID)
        #[arg(short, long)]
        paid_by: String,
        /// How to split: equal, exact or percent
        #[arg(short, long, default_value = "equal")]
        split: SplitMode,
        /// Participant share: NAME, or NAME=VALUE for exact/percent splits
        #[arg(long = "share", value_name = "NAME[=VALUE]")]
        shares: Vec<String>,
        /// Category label
        #[arg(short, long)]
        category: Option<String>,
        /// Currency label (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List expenses, newest first
    List {
        /// Only expenses this person paid for or shares
        #[arg(long)]
        person: Option<String>,
        /// Number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show an expense and its shares
    Show {
        /// Expense ID (short or full)
        expense: String,
    },
    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID (short or full)
        expense: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> SplitbookResult<()> {
    let service = ExpenseService::new(storage);
    let people = ParticipantService::new(storage);
    let symbol = &settings.currency_symbol;

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            paid_by,
            split,
            shares,
            category,
            currency,
            date,
        } => {
            let amount =
                Money::parse(&amount).map_err(|e| SplitbookError::Validation(e.to_string()))?;
            let payer = people.get(&paid_by)?;
            let inputs = if shares.is_empty() {
                equal_among_everyone(split, &people.list()?)?
            } else {
                shares
                    .iter()
                    .map(|arg| parse_share(arg, split, &people))
                    .collect::<SplitbookResult<Vec<_>>>()?
            };

            let mut new = NewExpense::new(description, amount, payer.id, split, inputs)
                .with_currency(currency.unwrap_or_else(|| settings.default_currency.clone()));
            if let Some(category) = category {
                new = new.with_category(category);
            }
            if let Some(date) = date {
                new = new.with_date(parse_date(&date)?);
            }

            let expense = service.add(new)?;
            println!(
                "Added expense {} ({}): {} paid by {}",
                expense.description,
                expense.id.short(),
                expense.amount.format_with_symbol(symbol),
                payer.name
            );
        }

        ExpenseCommands::List { person, limit } => {
            let mut expenses = match person {
                Some(person) => service.by_participant(people.get(&person)?.id)?,
                None => service.list()?,
            };
            if let Some(limit) = limit {
                expenses.truncate(limit);
            }
            println!(
                "{}",
                format_expense_list(&expenses, &people.list()?, symbol, &settings.date_format)
            );
        }

        ExpenseCommands::Show { expense } => {
            let expense = service.get(&expense)?;
            println!(
                "{}",
                format_expense_details(&expense, &people.list()?, symbol, &settings.date_format)
            );
        }

        ExpenseCommands::Delete { expense, force } => {
            let e = service.get(&expense)?;

            if !force {
                println!("About to delete expense: {}", e);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(&expense)?;
            println!("Deleted expense: {}", deleted.description);
        }
    }

    Ok(())
}

fn equal_among_everyone(
    split: SplitMode,
    participants: &[Participant],
) -> SplitbookResult<Vec<ShareInput>> {
    if split != SplitMode::Equal {
        return Err(SplitbookError::Validation(format!(
            "A {} split needs --share NAME=VALUE for each participant",
            split.to_string().to_lowercase()
        )));
    }
    Ok(participants.iter().map(|p| ShareInput::equal(p.id)).collect())
}

/// Parse one `--share` argument for the given split mode
fn parse_share(
    arg: &str,
    split: SplitMode,
    people: &ParticipantService<'_>,
) -> SplitbookResult<ShareInput> {
    let (name, value) = match arg.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (arg.trim(), None),
    };
    let participant = people.get(name)?;

    match (split, value) {
        (SplitMode::Equal, None) => Ok(ShareInput::equal(participant.id)),
        (SplitMode::Equal, Some(_)) => Err(SplitbookError::Validation(format!(
            "Equal splits take names only, got '{}'",
            arg
        ))),
        (SplitMode::Exact, Some(value)) => {
            let amount =
                Money::parse(value).map_err(|e| SplitbookError::Validation(e.to_string()))?;
            Ok(ShareInput::exact(participant.id, amount))
        }
        (SplitMode::Percent, Some(value)) => {
            let percent =
                Percent::parse(value).map_err(|e| SplitbookError::Validation(e.to_string()))?;
            Ok(ShareInput::percent(participant.id, percent))
        }
        (_, None) => Err(SplitbookError::Validation(format!(
            "Missing value for '{}': use NAME=VALUE",
            arg
        ))),
    }
}

fn parse_date(s: &str) -> SplitbookResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        SplitbookError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", s))
    })
}

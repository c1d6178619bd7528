//! Person CLI commands
//!
//! Implements CLI commands for managing the people in a ledger.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_list, format_participant_list};
use crate::error::SplitbookResult;
use crate::services::{BalanceService, ExpenseService, ParticipantService};
use crate::storage::Storage;

/// Person subcommands
#[derive(Subcommand, Debug)]
pub enum PersonCommands {
    /// Add a person to the ledger
    Add {
        /// Display name (unique, case-insensitive)
        name: String,
    },
    /// List everyone in the ledger
    List,
    /// Show a person's balance and expenses
    Show {
        /// Name or ID
        person: String,
    },
    /// Rename a person
    Rename {
        /// Current name or ID
        person: String,
        /// New name
        name: String,
    },
    /// Remove a person who is not part of any expense
    #[command(alias = "rm")]
    Remove {
        /// Name or ID
        person: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a person command
pub fn handle_person_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PersonCommands,
) -> SplitbookResult<()> {
    let service = ParticipantService::new(storage);

    match cmd {
        PersonCommands::Add { name } => {
            let person = service.add(&name)?;
            println!("Added {} ({})", person.name, person.id.short());
        }

        PersonCommands::List => {
            let people = service.list()?;
            println!("{}", format_participant_list(&people, &settings.date_format));
        }

        PersonCommands::Show { person } => {
            let person = service.get(&person)?;
            let report = BalanceService::new(storage).report()?;
            let symbol = &settings.currency_symbol;

            println!("Person: {}", person.name);
            println!("ID:     {}", person.id);
            if let Some(total) = report.total_for(person.id) {
                println!("Paid:   {}", total.paid.format_with_symbol(symbol));
                println!("Owes:   {}", total.owed.format_with_symbol(symbol));
                println!("Net:    {}", total.net.format_with_symbol(symbol));
            }
            for settlement in report
                .settlements
                .iter()
                .filter(|s| s.from == person.id || s.to == person.id)
            {
                println!(
                    "  {} pays {} {}",
                    report.name_of(settlement.from),
                    report.name_of(settlement.to),
                    settlement.amount.format_with_symbol(symbol)
                );
            }

            let expenses = ExpenseService::new(storage).by_participant(person.id)?;
            println!();
            println!(
                "{}",
                format_expense_list(&expenses, &service.list()?, symbol, &settings.date_format)
            );
        }

        PersonCommands::Rename { person, name } => {
            let old_name = service.get(&person)?.name;
            let renamed = service.rename(&person, &name)?;
            println!("Renamed {} to {}", old_name, renamed.name);
        }

        PersonCommands::Remove { person, force } => {
            let p = service.get(&person)?;

            if !force {
                println!("About to remove: {}", p.name);
                println!("Use --force to confirm removal");
                return Ok(());
            }

            let removed = service.remove(&person)?;
            println!("Removed {}", removed.name);
        }
    }

    Ok(())
}

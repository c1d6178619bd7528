//! Settle CLI commands: mark suggested payments as paid

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::SplitbookResult;
use crate::services::{ParticipantService, SettlementService};
use crate::storage::Storage;

/// Settle subcommands
#[derive(Subcommand, Debug)]
pub enum SettleCommands {
    /// Mark the payment FROM -> TO as paid
    Mark {
        /// Who pays (name or ID)
        from: String,
        /// Who gets paid (name or ID)
        to: String,
    },
    /// Remove the paid mark from FROM -> TO
    Unmark {
        /// Who pays (name or ID)
        from: String,
        /// Who gets paid (name or ID)
        to: String,
    },
}

/// Handle a settle command
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SettleCommands,
) -> SplitbookResult<()> {
    let service = SettlementService::new(storage);
    let people = ParticipantService::new(storage);

    match cmd {
        SettleCommands::Mark { from, to } => {
            let settlement = service.mark_paid(&from, &to)?;
            println!(
                "Marked as paid: {} pays {} {}",
                people.get(&from)?.name,
                people.get(&to)?.name,
                settlement.amount.format_with_symbol(&settings.currency_symbol)
            );
        }
        SettleCommands::Unmark { from, to } => {
            service.unmark_paid(&from, &to)?;
            println!(
                "No longer marked as paid: {} -> {}",
                people.get(&from)?.name,
                people.get(&to)?.name
            );
        }
    }

    Ok(())
}

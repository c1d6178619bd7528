//! Display formatting for terminal output
//!
//! Renders participants, expenses and balance reports as `tabled` tables.
//! Amounts are printed with the currency symbol from settings.

pub mod balance;
pub mod expense;
pub mod participant;

pub use balance::{format_balance_report, format_settlements, format_summary};
pub use expense::{format_expense_details, format_expense_list};
pub use participant::format_participant_list;

use std::collections::HashMap;

use crate::models::{Participant, ParticipantId};

/// Participant names keyed by ID
pub(crate) fn name_lookup(participants: &[Participant]) -> HashMap<ParticipantId, String> {
    participants.iter().map(|p| (p.id, p.name.clone())).collect()
}

/// Name for an ID, falling back to the short ID for people no longer in the ledger
pub(crate) fn display_name(names: &HashMap<ParticipantId, String>, id: ParticipantId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.short())
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

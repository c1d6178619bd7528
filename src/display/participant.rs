//! Participant display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Participant;

#[derive(Tabled)]
struct ParticipantRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Added")]
    added: String,
}

/// Format participants as a table, in ledger order
pub fn format_participant_list(participants: &[Participant], date_format: &str) -> String {
    if participants.is_empty() {
        return "No people in this ledger yet.".to_string();
    }

    let rows = participants.iter().map(|p| ParticipantRow {
        id: p.id.short(),
        name: p.name.clone(),
        added: p.created_at.format(date_format).to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{}\n{} people", table, participants.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        assert_eq!(
            format_participant_list(&[], "%Y-%m-%d"),
            "No people in this ledger yet."
        );
    }

    #[test]
    fn test_list_contains_names_and_ids() {
        let ana = Participant::new("Ana");
        let ben = Participant::new("Ben");
        let output = format_participant_list(&[ana.clone(), ben], "%Y-%m-%d");

        assert!(output.contains("Ana"));
        assert!(output.contains("Ben"));
        assert!(output.contains(&ana.id.short()));
        assert!(output.ends_with("2 people"));
    }
}

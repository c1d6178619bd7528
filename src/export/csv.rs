//! CSV Export functionality
//!
//! Spreadsheet-friendly exports of settlements, per-person totals and
//! expenses. Amounts are plain decimals without a currency symbol.

use std::io::Write;

use crate::display::{display_name, name_lookup};
use crate::error::{SplitbookError, SplitbookResult};
use crate::services::BalanceService;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> SplitbookError {
    SplitbookError::Export(e.to_string())
}

/// Export suggested settlements: who pays whom how much
pub fn export_settlements_csv<W: Write>(storage: &Storage, writer: W) -> SplitbookResult<()> {
    let report = BalanceService::new(storage).report()?;
    let mut out = ::csv::Writer::from_writer(writer);

    out.write_record(["From", "To", "Amount"]).map_err(export_err)?;
    for settlement in &report.settlements {
        out.write_record([
            report.name_of(settlement.from),
            report.name_of(settlement.to),
            settlement.amount.to_decimal_string(),
        ])
        .map_err(export_err)?;
    }

    out.flush().map_err(export_err)?;
    Ok(())
}

/// Export paid/owed/net per participant
pub fn export_totals_csv<W: Write>(storage: &Storage, writer: W) -> SplitbookResult<()> {
    let report = BalanceService::new(storage).report()?;
    let mut out = ::csv::Writer::from_writer(writer);

    out.write_record(["ID", "Name", "Paid", "Owed", "Net"])
        .map_err(export_err)?;
    for total in &report.totals {
        out.write_record([
            total.participant_id.to_string(),
            total.display_name.clone(),
            total.paid.to_decimal_string(),
            total.owed.to_decimal_string(),
            total.net.to_decimal_string(),
        ])
        .map_err(export_err)?;
    }

    out.flush().map_err(export_err)?;
    Ok(())
}

/// Export expenses, one row per share
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: W) -> SplitbookResult<()> {
    let names = name_lookup(&storage.participants.get_all()?);
    let expenses = storage.expenses.get_all()?;
    let mut out = ::csv::Writer::from_writer(writer);

    out.write_record([
        "Expense ID",
        "Date",
        "Description",
        "Category",
        "Currency",
        "Total",
        "Paid By",
        "Split",
        "Participant",
        "Share",
    ])
    .map_err(export_err)?;

    for expense in &expenses {
        for share in &expense.shares {
            out.write_record([
                expense.id.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.description.clone(),
                expense.category.clone().unwrap_or_default(),
                expense.currency.clone(),
                expense.amount.to_decimal_string(),
                display_name(&names, expense.paid_by),
                expense.split_mode.to_string(),
                display_name(&names, share.participant_id),
                share.amount.to_decimal_string(),
            ])
            .map_err(export_err)?;
        }
    }

    out.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, ShareInput, SplitMode};
    use crate::services::{ExpenseService, NewExpense, ParticipantService};

    fn populated() -> Storage {
        let storage = Storage::in_memory();
        let people = ParticipantService::new(&storage);
        let ana = people.add("Ana").unwrap().id;
        let ben = people.add("Ben").unwrap().id;
        ExpenseService::new(&storage)
            .add(
                NewExpense::new(
                    "Pizza, large",
                    Money::from_cents(2500),
                    ana,
                    SplitMode::Equal,
                    vec![ShareInput::equal(ana), ShareInput::equal(ben)],
                )
                .with_category("Food"),
            )
            .unwrap();
        storage
    }

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> SplitbookResult<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_settlements_csv() {
        let storage = populated();
        let text = to_string(|w| export_settlements_csv(&storage, w));
        assert_eq!(text, "From,To,Amount\nBen,Ana,12.50\n");
    }

    #[test]
    fn test_totals_csv() {
        let storage = populated();
        let text = to_string(|w| export_totals_csv(&storage, w));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "ID,Name,Paid,Owed,Net");
        assert!(lines[1].ends_with("Ana,25.00,12.50,12.50"));
        assert!(lines[2].ends_with("Ben,0.00,12.50,-12.50"));
    }

    #[test]
    fn test_expenses_csv_quotes_commas() {
        let storage = populated();
        let text = to_string(|w| export_expenses_csv(&storage, w));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"Pizza, large\",Food,USD,25.00,Ana,Equal,Ana,12.50"));
        assert!(lines[2].ends_with("Ben,12.50"));
    }
}

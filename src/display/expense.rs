//! Expense display formatting
//!
//! A list view (one row per expense) and a detail view with every share.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::{display_name, name_lookup, truncate};
use crate::models::{Expense, Participant};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Paid by")]
    paid_by: String,
    #[tabled(rename = "Split")]
    split: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Participant")]
    participant: String,
    #[tabled(rename = "Percent")]
    percent: String,
    #[tabled(rename = "Owes")]
    amount: String,
}

/// Format expenses as a table
pub fn format_expense_list(
    expenses: &[Expense],
    participants: &[Participant],
    symbol: &str,
    date_format: &str,
) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.".to_string();
    }

    let names = name_lookup(participants);
    let rows = expenses.iter().map(|e| ExpenseRow {
        id: e.id.short(),
        date: e.date.format(date_format).to_string(),
        description: truncate(&e.description, 30),
        category: e.category.clone().unwrap_or_default(),
        paid_by: display_name(&names, e.paid_by),
        split: e.split_mode.to_string(),
        amount: format!("{} {}", e.amount.format_with_symbol(symbol), e.currency),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .with(Modify::new(Columns::last()).with(Alignment::right()));

    match crate::models::Money::checked_sum(expenses.iter().map(|e| e.amount)) {
        Some(total) => format!(
            "{}\n{} expenses, {} total",
            table,
            expenses.len(),
            total.format_with_symbol(symbol)
        ),
        None => format!("{}\n{} expenses", table, expenses.len()),
    }
}

/// Format one expense with its shares
pub fn format_expense_details(
    expense: &Expense,
    participants: &[Participant],
    symbol: &str,
    date_format: &str,
) -> String {
    let names = name_lookup(participants);

    let mut output = String::new();
    output.push_str(&format!("Expense:     {}\n", expense.description));
    output.push_str(&format!("ID:          {}\n", expense.id));
    output.push_str(&format!(
        "Date:        {}\n",
        expense.date.format(date_format)
    ));
    output.push_str(&format!(
        "Amount:      {} {}\n",
        expense.amount.format_with_symbol(symbol),
        expense.currency
    ));
    output.push_str(&format!(
        "Paid by:     {}\n",
        display_name(&names, expense.paid_by)
    ));
    if let Some(category) = &expense.category {
        output.push_str(&format!("Category:    {}\n", category));
    }
    output.push_str(&format!("Split:       {}\n\n", expense.split_mode));

    let rows = expense.shares.iter().map(|s| ShareRow {
        participant: display_name(&names, s.participant_id),
        percent: s.percent.map(|p| p.to_string()).unwrap_or_default(),
        amount: s.amount.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    output.push_str(&table.to_string());

    output
}

//! Balance report display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::{BalanceReport, Money, SettlementStatus};

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Person")]
    name: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Owes")]
    owed: String,
    #[tabled(rename = "Balance")]
    net: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Signed amount: "+$5.00" for credit, "-$5.00" for debt
fn signed(amount: Money, symbol: &str) -> String {
    if amount.is_positive() {
        format!("+{}", amount.format_with_symbol(symbol))
    } else {
        amount.format_with_symbol(symbol)
    }
}

fn paid_suffix(status: &SettlementStatus) -> &'static str {
    if status.paid {
        " (paid)"
    } else {
        ""
    }
}

/// Settlements as one "X pays Y $N" line each
pub fn format_settlements(
    report: &BalanceReport,
    statuses: &[SettlementStatus],
    symbol: &str,
) -> String {
    if statuses.is_empty() {
        return "All settled up.".to_string();
    }

    statuses
        .iter()
        .map(|status| {
            let s = &status.settlement;
            format!(
                "{} pays {} {}{}",
                report.name_of(s.from),
                report.name_of(s.to),
                s.amount.format_with_symbol(symbol),
                paid_suffix(status)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text message listing who owes whom, for pasting into a chat
pub fn format_summary(
    report: &BalanceReport,
    statuses: &[SettlementStatus],
    ledger: &str,
    symbol: &str,
) -> String {
    if statuses.is_empty() {
        return format!("Balance for \"{}\": all settled up.", ledger);
    }

    let mut output = format!("Balance for \"{}\":", ledger);
    for status in statuses {
        let s = &status.settlement;
        output.push_str(&format!(
            "\n- {} owes {} to {}{}",
            report.name_of(s.from),
            s.amount.format_with_symbol(symbol),
            report.name_of(s.to),
            paid_suffix(status)
        ));
    }
    output
}

/// Full report: per-person totals, settlements and category totals
pub fn format_balance_report(
    report: &BalanceReport,
    statuses: &[SettlementStatus],
    symbol: &str,
) -> String {
    if report.totals.is_empty() && report.by_category.is_empty() {
        return "Nothing to balance yet.".to_string();
    }

    let mut output = String::new();

    if !report.totals.is_empty() {
        let rows = report.totals.iter().map(|t| TotalRow {
            name: t.display_name.clone(),
            paid: t.paid.format_with_symbol(symbol),
            owed: t.owed.format_with_symbol(symbol),
            net: signed(t.net, symbol),
        });
        let mut table = Table::new(rows);
        table
            .with(Style::sharp())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

        output.push_str("Balances\n");
        output.push_str(&table.to_string());
        output.push_str("\n\n");
    }

    output.push_str("Settlements\n");
    output.push_str(&format_settlements(report, statuses, symbol));
    output.push('\n');

    if !report.by_category.is_empty() {
        let rows = report.by_category.iter().map(|c| CategoryRow {
            category: c.category.clone(),
            total: c.total.format_with_symbol(symbol),
        });
        let mut table = Table::new(rows);
        table
            .with(Style::sharp())
            .with(Modify::new(Columns::last()).with(Alignment::right()));

        output.push_str("\nBy category\n");
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&format!(
        "\nTotal spent: {}",
        report.total_spent().format_with_symbol(symbol)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BalanceTotal, CategoryTotal, PaidFlag, ParticipantId, Settlement};

    fn total(id: ParticipantId, name: &str, paid: i64, owed: i64) -> BalanceTotal {
        BalanceTotal {
            participant_id: id,
            display_name: name.to_string(),
            paid: Money::from_cents(paid),
            owed: Money::from_cents(owed),
            net: Money::from_cents(paid - owed),
        }
    }

    #[test]
    fn test_empty_report() {
        let empty = BalanceReport::default();
        assert_eq!(format_balance_report(&empty, &[], "$"), "Nothing to balance yet.");
        assert_eq!(format_settlements(&empty, &[], "$"), "All settled up.");
        assert_eq!(
            format_summary(&empty, &[], "trip", "$"),
            "Balance for \"trip\": all settled up."
        );
    }

    #[test]
    fn test_report_lines() {
        let ana = ParticipantId::new();
        let ben = ParticipantId::new();
        let report = BalanceReport {
            totals: vec![total(ana, "Ana", 6000, 3000), total(ben, "Ben", 0, 3000)],
            settlements: vec![Settlement {
                from: ben,
                to: ana,
                amount: Money::from_cents(3000),
            }],
            by_category: vec![CategoryTotal {
                category: "Food".into(),
                total: Money::from_cents(6000),
            }],
        };

        let statuses = report.settlement_statuses(&[]);
        assert_eq!(format_settlements(&report, &statuses, "$"), "Ben pays Ana $30.00");

        let output = format_balance_report(&report, &statuses, "€");
        assert!(output.contains("+€30.00"));
        assert!(output.contains("-€30.00"));
        assert!(output.contains("Ben pays Ana €30.00"));
        assert!(output.contains("Food"));
        assert!(output.ends_with("Total spent: €60.00"));
    }

    #[test]
    fn test_paid_marker_and_summary() {
        let (ana, ben, cy) = (ParticipantId::new(), ParticipantId::new(), ParticipantId::new());
        let report = BalanceReport {
            totals: vec![
                total(ana, "Ana", 3000, 1000),
                total(ben, "Ben", 0, 1000),
                total(cy, "Cy", 0, 1000),
            ],
            settlements: vec![
                Settlement {
                    from: ben,
                    to: ana,
                    amount: Money::from_cents(1000),
                },
                Settlement {
                    from: cy,
                    to: ana,
                    amount: Money::from_cents(1000),
                },
            ],
            by_category: Vec::new(),
        };
        let statuses = report.settlement_statuses(&[PaidFlag::new(ben, ana)]);

        assert_eq!(
            format_settlements(&report, &statuses, "$"),
            "Ben pays Ana $10.00 (paid)\nCy pays Ana $10.00"
        );
        assert_eq!(
            format_summary(&report, &statuses, "trip", "$"),
            "Balance for \"trip\":\n- Ben owes $10.00 to Ana (paid)\n- Cy owes $10.00 to Ana"
        );
        let full = format_balance_report(&report, &statuses, "$");
        assert!(full.contains("Ben pays Ana $10.00 (paid)"));
    }
}

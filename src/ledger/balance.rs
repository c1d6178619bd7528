//! Balance engine
//!
//! Reduces a set of expenses to per-participant totals, a list of payments
//! that settles everyone, and spending per category.

use std::collections::HashMap;

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{
    BalanceReport, BalanceTotal, CategoryTotal, ExpenseRecord, Money, Participant, ParticipantId,
    Settlement, UNCATEGORIZED,
};

/// Compute balances, settlements and category totals
///
/// Totals follow the order of `participants`. IDs that only appear in
/// expenses are appended in the order they are first seen, named by their ID.
/// With no participants at all, totals and settlements are empty.
///
/// Settlements come from a greedy walk over debtors and creditors in totals
/// order. It emits at most `n - 1` payments but is not guaranteed to find the
/// smallest possible number.
///
/// # Errors
///
/// Returns [`SplitbookError::DataIntegrity`] when the amounts are too large to
/// add up, or when balances don't sum to zero, which happens when an
/// expense's shares don't add up to its total.
pub fn compute_balances(
    participants: &[Participant],
    expenses: &[ExpenseRecord],
) -> SplitbookResult<BalanceReport> {
    // Everything below is bounded by the grand total, so check it once up front
    Money::checked_sum(expenses.iter().map(|e| e.total_amount)).ok_or_else(overflow)?;
    let by_category = category_totals(expenses)?;

    if participants.is_empty() {
        return Ok(BalanceReport {
            totals: Vec::new(),
            settlements: Vec::new(),
            by_category,
        });
    }

    let totals = participant_totals(participants, expenses)?;
    let settlements = settle(&totals)?;

    Ok(BalanceReport {
        totals,
        settlements,
        by_category,
    })
}

fn overflow() -> SplitbookError {
    SplitbookError::DataIntegrity("Expense amounts are too large to add up".into())
}

/// Paid/owed accumulator that keeps first-seen order
struct Tally {
    entries: Vec<BalanceTotal>,
    index: HashMap<ParticipantId, usize>,
}

impl Tally {
    fn new(participants: &[Participant]) -> Self {
        let mut tally = Self {
            entries: Vec::with_capacity(participants.len()),
            index: HashMap::with_capacity(participants.len()),
        };
        for participant in participants {
            tally.entry(participant.id, || participant.name.clone());
        }
        tally
    }

    fn entry(
        &mut self,
        participant_id: ParticipantId,
        name: impl FnOnce() -> String,
    ) -> &mut BalanceTotal {
        let position = match self.index.get(&participant_id) {
            Some(&position) => position,
            None => {
                self.entries.push(BalanceTotal {
                    participant_id,
                    display_name: name(),
                    paid: Money::zero(),
                    owed: Money::zero(),
                    net: Money::zero(),
                });
                let position = self.entries.len() - 1;
                self.index.insert(participant_id, position);
                position
            }
        };
        &mut self.entries[position]
    }

    fn add_paid(&mut self, participant_id: ParticipantId, amount: Money) -> SplitbookResult<()> {
        let total = self.entry(participant_id, || participant_id.short());
        total.paid = total.paid.checked_add(amount).ok_or_else(overflow)?;
        Ok(())
    }

    fn add_owed(&mut self, participant_id: ParticipantId, amount: Money) -> SplitbookResult<()> {
        let total = self.entry(participant_id, || participant_id.short());
        total.owed = total.owed.checked_add(amount).ok_or_else(overflow)?;
        Ok(())
    }

    fn into_totals(self) -> SplitbookResult<Vec<BalanceTotal>> {
        self.entries
            .into_iter()
            .map(|mut total| {
                total.net = total.paid.checked_sub(total.owed).ok_or_else(overflow)?;
                Ok(total)
            })
            .collect()
    }
}

fn participant_totals(
    participants: &[Participant],
    expenses: &[ExpenseRecord],
) -> SplitbookResult<Vec<BalanceTotal>> {
    let mut tally = Tally::new(participants);

    for expense in expenses {
        tally.add_paid(expense.payer_id, expense.total_amount)?;
        for share in &expense.shares {
            tally.add_owed(share.participant_id, share.amount)?;
        }
    }

    tally.into_totals()
}

fn category_totals(expenses: &[ExpenseRecord]) -> SplitbookResult<Vec<CategoryTotal>> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        let label = expense
            .category_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(UNCATEGORIZED);

        match totals.iter_mut().find(|t| t.category == label) {
            Some(existing) => {
                existing.total = existing
                    .total
                    .checked_add(expense.total_amount)
                    .ok_or_else(overflow)?
            }
            None => totals.push(CategoryTotal {
                category: label.to_string(),
                total: expense.total_amount,
            }),
        }
    }

    Ok(totals)
}

/// Someone's outstanding debt or credit during the settlement walk
struct Outstanding {
    participant_id: ParticipantId,
    remaining: Money,
}

fn settle(totals: &[BalanceTotal]) -> SplitbookResult<Vec<Settlement>> {
    let mut debtors: Vec<Outstanding> = Vec::new();
    let mut creditors: Vec<Outstanding> = Vec::new();
    for total in totals {
        if total.net.is_negative() {
            debtors.push(Outstanding {
                participant_id: total.participant_id,
                remaining: Money::zero().checked_sub(total.net).ok_or_else(overflow)?,
            });
        } else if total.net.is_positive() {
            creditors.push(Outstanding {
                participant_id: total.participant_id,
                remaining: total.net,
            });
        }
    }

    let mut settlements = Vec::new();
    let mut debtor_index = 0;
    let mut creditor_index = 0;

    while debtor_index < debtors.len() && creditor_index < creditors.len() {
        let debtor = &mut debtors[debtor_index];
        let creditor = &mut creditors[creditor_index];
        let amount = debtor.remaining.min(creditor.remaining);

        settlements.push(Settlement {
            from: debtor.participant_id,
            to: creditor.participant_id,
            amount,
        });

        debtor.remaining -= amount;
        creditor.remaining -= amount;

        if debtor.remaining.is_zero() {
            debtor_index += 1;
        }
        if creditor.remaining.is_zero() {
            creditor_index += 1;
        }
    }

    let unpaid = Money::checked_sum(debtors[debtor_index..].iter().map(|d| d.remaining))
        .ok_or_else(overflow)?;
    let unclaimed = Money::checked_sum(creditors[creditor_index..].iter().map(|c| c.remaining))
        .ok_or_else(overflow)?;
    if !unpaid.is_zero() || !unclaimed.is_zero() {
        return Err(SplitbookError::DataIntegrity(format!(
            "Balances do not sum to zero ({} owed with no creditor, {} due with no debtor); \
             some expense shares do not add up to the expense total",
            unpaid, unclaimed
        )));
    }

    Ok(settlements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::compute_shares;
    use crate::models::{Share, ShareInput, SplitMode};

    fn people(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|n| Participant::new(*n)).collect()
    }

    fn equal_expense(
        total_cents: i64,
        payer: &Participant,
        among: &[&Participant],
        category: Option<&str>,
    ) -> ExpenseRecord {
        let inputs: Vec<_> = among.iter().map(|p| ShareInput::equal(p.id)).collect();
        let total = Money::from_cents(total_cents);
        ExpenseRecord {
            total_amount: total,
            payer_id: payer.id,
            category_label: category.map(String::from),
            shares: compute_shares(total, SplitMode::Equal, &inputs).unwrap(),
        }
    }

    /// Apply settlements to the nets and check everyone ends at zero
    fn assert_settles(report: &BalanceReport) {
        let mut nets: HashMap<ParticipantId, Money> = report
            .totals
            .iter()
            .map(|t| (t.participant_id, t.net))
            .collect();

        for s in &report.settlements {
            assert!(s.amount.is_positive());
            *nets.get_mut(&s.from).unwrap() += s.amount;
            *nets.get_mut(&s.to).unwrap() -= s.amount;
        }

        assert!(nets.values().all(|n| n.is_zero()), "{:?}", nets);
    }

    fn net_sum(report: &BalanceReport) -> Money {
        report.totals.iter().map(|t| t.net).sum()
    }

    #[test]
    fn test_three_way_equal_split() {
        let group = people(&["A", "B", "C"]);
        let (a, b, c) = (&group[0], &group[1], &group[2]);
        let expenses = vec![equal_expense(10_000, a, &[a, b, c], None)];

        let report = compute_balances(&group, &expenses).unwrap();

        // shares 33.33 / 33.33 / 33.34
        let nets: Vec<i64> = report.totals.iter().map(|t| t.net.cents()).collect();
        assert_eq!(nets, vec![6667, -3333, -3334]);
        assert_eq!(net_sum(&report), Money::zero());

        assert_eq!(
            report.settlements,
            vec![
                Settlement {
                    from: b.id,
                    to: a.id,
                    amount: Money::from_cents(3333)
                },
                Settlement {
                    from: c.id,
                    to: a.id,
                    amount: Money::from_cents(3334)
                },
            ]
        );
        assert_settles(&report);
    }

    #[test]
    fn test_percent_split_balances() {
        let group = people(&["A", "B", "C"]);
        let inputs = vec![
            ShareInput::percent(group[0].id, crate::models::Percent::from_whole(50)),
            ShareInput::percent(group[1].id, crate::models::Percent::from_whole(30)),
            ShareInput::percent(group[2].id, crate::models::Percent::from_whole(20)),
        ];
        let total = Money::from_cents(10_000);
        let expenses = vec![ExpenseRecord {
            total_amount: total,
            payer_id: group[0].id,
            category_label: None,
            shares: compute_shares(total, SplitMode::Percent, &inputs).unwrap(),
        }];

        let report = compute_balances(&group, &expenses).unwrap();
        let nets: Vec<i64> = report.totals.iter().map(|t| t.net.cents()).collect();
        assert_eq!(nets, vec![5000, -3000, -2000]);
        assert_settles(&report);
    }

    #[test]
    fn test_paid_and_owed_totals() {
        let group = people(&["A", "B"]);
        let (a, b) = (&group[0], &group[1]);
        let expenses = vec![
            equal_expense(6000, a, &[a, b], Some("Food")),
            equal_expense(2000, b, &[a, b], Some("Taxi")),
        ];

        let report = compute_balances(&group, &expenses).unwrap();
        let alice = report.total_for(a.id).unwrap();
        assert_eq!(alice.display_name, "A");
        assert_eq!(alice.paid, Money::from_cents(6000));
        assert_eq!(alice.owed, Money::from_cents(4000));
        assert_eq!(alice.net, Money::from_cents(2000));

        assert_eq!(report.settlements.len(), 1);
        assert_eq!(report.settlements[0].from, b.id);
        assert_eq!(report.settlements[0].amount, Money::from_cents(2000));
    }

    #[test]
    fn test_single_participant_pays_and_owes() {
        let group = people(&["Solo"]);
        let expenses = vec![equal_expense(4200, &group[0], &[&group[0]], None)];

        let report = compute_balances(&group, &expenses).unwrap();
        assert_eq!(report.totals[0].net, Money::zero());
        assert!(report.is_settled());
    }

    #[test]
    fn test_empty_inputs() {
        let report = compute_balances(&[], &[]).unwrap();
        assert!(report.totals.is_empty());
        assert!(report.settlements.is_empty());
        assert!(report.by_category.is_empty());

        let group = people(&["A", "B"]);
        let report = compute_balances(&group, &[]).unwrap();
        assert_eq!(report.totals.len(), 2);
        assert!(report.totals.iter().all(|t| t.net.is_zero()));
        assert!(report.is_settled());
    }

    #[test]
    fn test_unknown_participant_gets_a_balance_line() {
        let group = people(&["A"]);
        let stranger = ParticipantId::new();
        let expenses = vec![ExpenseRecord {
            total_amount: Money::from_cents(1000),
            payer_id: group[0].id,
            category_label: None,
            shares: vec![
                Share::new(group[0].id, Money::from_cents(500)),
                Share::new(stranger, Money::from_cents(500)),
            ],
        }];

        let report = compute_balances(&group, &expenses).unwrap();
        assert_eq!(report.totals.len(), 2);
        assert_eq!(report.totals[1].participant_id, stranger);
        assert_eq!(report.totals[1].display_name, stranger.short());
        assert_eq!(report.totals[1].net, Money::from_cents(-500));
        assert_settles(&report);
    }

    #[test]
    fn test_mismatched_shares_are_a_data_integrity_error() {
        let group = people(&["A", "B"]);
        let expenses = vec![ExpenseRecord {
            total_amount: Money::from_cents(10_000),
            payer_id: group[0].id,
            category_label: None,
            shares: vec![
                Share::new(group[0].id, Money::from_cents(5000)),
                Share::new(group[1].id, Money::from_cents(4999)),
            ],
        }];

        let err = compute_balances(&group, &expenses).unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn test_overflowing_totals_are_a_data_integrity_error() {
        let group = people(&["A", "B"]);
        let (a, b) = (&group[0], &group[1]);
        let huge = 5_000_000_000_000_000_000;
        let expenses = vec![
            equal_expense(huge, a, &[a, b], None),
            equal_expense(huge, a, &[a, b], None),
        ];

        let err = compute_balances(&group, &expenses).unwrap_err();
        assert!(err.is_data_integrity());

        // Same overflow with nobody to attribute it to
        let err = compute_balances(&[], &expenses).unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn test_settlement_follows_input_order() {
        // D and E owe; A and B are owed. The walk pairs them in list order.
        let group = people(&["A", "B", "D", "E"]);
        let (a, b, d, e) = (&group[0], &group[1], &group[2], &group[3]);
        let expenses = vec![
            ExpenseRecord {
                total_amount: Money::from_cents(3000),
                payer_id: a.id,
                category_label: None,
                shares: vec![
                    Share::new(d.id, Money::from_cents(1000)),
                    Share::new(e.id, Money::from_cents(2000)),
                ],
            },
            ExpenseRecord {
                total_amount: Money::from_cents(1000),
                payer_id: b.id,
                category_label: None,
                shares: vec![Share::new(d.id, Money::from_cents(1000))],
            },
        ];

        let report = compute_balances(&group, &expenses).unwrap();
        let pairs: Vec<(ParticipantId, ParticipantId, i64)> = report
            .settlements
            .iter()
            .map(|s| (s.from, s.to, s.amount.cents()))
            .collect();
        assert_eq!(
            pairs,
            vec![(d.id, a.id, 2000), (e.id, a.id, 1000), (e.id, b.id, 1000)]
        );
        assert!(report.settlements.len() <= group.len() - 1);
        assert_settles(&report);
    }

    #[test]
    fn test_category_totals() {
        let group = people(&["A", "B"]);
        let (a, b) = (&group[0], &group[1]);
        let expenses = vec![
            equal_expense(1000, a, &[a, b], Some("Food")),
            equal_expense(500, b, &[a, b], None),
            equal_expense(250, b, &[a, b], Some("Food")),
            equal_expense(300, a, &[a, b], Some("  ")),
        ];

        let report = compute_balances(&group, &expenses).unwrap();
        assert_eq!(
            report.by_category,
            vec![
                CategoryTotal {
                    category: "Food".into(),
                    total: Money::from_cents(1250)
                },
                CategoryTotal {
                    category: UNCATEGORIZED.into(),
                    total: Money::from_cents(800)
                },
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let group = people(&["A", "B", "C"]);
        let (a, b, c) = (&group[0], &group[1], &group[2]);
        let expenses = vec![
            equal_expense(10_000, a, &[a, b, c], Some("Hotel")),
            equal_expense(4_500, c, &[b, c], Some("Food")),
        ];

        let first = compute_balances(&group, &expenses).unwrap();
        let second = compute_balances(&group, &expenses).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_many_expenses_stay_zero_sum_and_settle() {
        // Small deterministic generator so the test is reproducible
        let mut seed: u64 = 0x5eed;
        let mut next = move |bound: u64| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) % bound
        };

        let group = people(&["A", "B", "C", "D", "E", "F", "G"]);
        let mut expenses = Vec::new();
        for _ in 0..300 {
            let payer = &group[next(group.len() as u64) as usize];
            let among: Vec<&Participant> = group.iter().filter(|_| next(2) == 0).collect();
            if among.is_empty() {
                continue;
            }
            let cents = 1 + next(50_000) as i64;
            expenses.push(equal_expense(cents, payer, &among, None));
        }

        let report = compute_balances(&group, &expenses).unwrap();
        assert_eq!(net_sum(&report), Money::zero());
        assert!(report.settlements.len() < group.len());
        assert_settles(&report);
    }
}

//! Balance report types
//!
//! The report is produced by `ledger::balance::compute_balances`, recomputed
//! on every call and never persisted. Paid flags are the one piece of
//! settlement state that is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ParticipantId;
use super::money::Money;

/// Label used for expenses without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// What one participant paid, owes, and the difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTotal {
    pub participant_id: ParticipantId,
    pub display_name: String,
    /// Sum of expense totals this participant paid
    pub paid: Money,
    /// Sum of this participant's shares
    pub owed: Money,
    /// `paid - owed`; positive means the group owes them
    pub net: Money,
}

/// `from` pays `to` the given amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// A settlement pair someone has marked as paid
///
/// Flags are keyed by the `(from, to)` pair, not the amount, so a flag stays
/// attached when later expenses change what is owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidFlag {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub marked_at: DateTime<Utc>,
}

impl PaidFlag {
    pub fn new(from: ParticipantId, to: ParticipantId) -> Self {
        Self {
            from,
            to,
            marked_at: Utc::now(),
        }
    }

    pub fn is_for(&self, from: ParticipantId, to: ParticipantId) -> bool {
        self.from == from && self.to == to
    }
}

/// A settlement together with whether it has been marked as paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementStatus {
    #[serde(flatten)]
    pub settlement: Settlement,
    pub paid: bool,
}

/// Sum of expense totals for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub totals: Vec<BalanceTotal>,
    pub settlements: Vec<Settlement>,
    pub by_category: Vec<CategoryTotal>,
}

impl BalanceReport {
    /// Total amount spent across all expenses
    pub fn total_spent(&self) -> Money {
        self.totals.iter().map(|t| t.paid).sum()
    }

    /// True when nobody owes anything
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }

    /// Balance line for a participant
    pub fn total_for(&self, participant_id: ParticipantId) -> Option<&BalanceTotal> {
        self.totals
            .iter()
            .find(|t| t.participant_id == participant_id)
    }

    /// Each settlement with its paid flag
    pub fn settlement_statuses(&self, flags: &[PaidFlag]) -> Vec<SettlementStatus> {
        self.settlements
            .iter()
            .map(|s| SettlementStatus {
                settlement: s.clone(),
                paid: flags.iter().any(|f| f.is_for(s.from, s.to)),
            })
            .collect()
    }

    /// Display name for a participant, falling back to its ID
    pub fn name_of(&self, participant_id: ParticipantId) -> String {
        self.total_for(participant_id)
            .map(|t| t.display_name.clone())
            .unwrap_or_else(|| participant_id.short())
    }
}

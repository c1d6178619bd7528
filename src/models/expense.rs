//! Expense model
//!
//! An expense is a single payment by one participant, partitioned into
//! per-participant shares. The shares are derived once, when the expense is
//! created, from a split mode and raw inputs (see `ledger::split`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ExpenseId, ParticipantId};
use super::money::{Money, Percent};

/// Policy used to derive shares from an expense total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Everyone pays the same, rounding remainder goes to the last participant
    #[default]
    Equal,
    /// Every participant states an exact amount
    Exact,
    /// Every participant states a percentage of the total
    Percent,
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "Equal"),
            Self::Exact => write!(f, "Exact"),
            Self::Percent => write!(f, "Percent"),
        }
    }
}

impl FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" | "equally" | "even" => Ok(Self::Equal),
            "exact" | "amount" | "amounts" => Ok(Self::Exact),
            "percent" | "percentage" | "pct" | "%" => Ok(Self::Percent),
            other => Err(format!(
                "Unknown split mode '{}' (expected equal, exact or percent)",
                other
            )),
        }
    }
}

/// Raw per-participant input to the split calculator
///
/// EXACT splits read `amount`, PERCENT splits read `percent`, EQUAL splits
/// read neither. A missing value counts as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareInput {
    pub participant_id: ParticipantId,
    pub amount: Option<Money>,
    pub percent: Option<Percent>,
}

impl ShareInput {
    /// Input for an EQUAL split
    pub fn equal(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            amount: None,
            percent: None,
        }
    }

    /// Input for an EXACT split
    pub fn exact(participant_id: ParticipantId, amount: Money) -> Self {
        Self {
            participant_id,
            amount: Some(amount),
            percent: None,
        }
    }

    /// Input for a PERCENT split
    pub fn percent(participant_id: ParticipantId, percent: Percent) -> Self {
        Self {
            participant_id,
            amount: None,
            percent: Some(percent),
        }
    }
}

/// The part of an expense one participant owes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant_id: ParticipantId,

    pub amount: Money,

    /// The percentage this share was derived from, for PERCENT splits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Percent>,
}

impl Share {
    pub fn new(participant_id: ParticipantId, amount: Money) -> Self {
        Self {
            participant_id,
            amount,
            percent: None,
        }
    }
}

/// A stored expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub description: String,

    /// Total paid
    pub amount: Money,

    /// Opaque currency label, never converted
    pub currency: String,

    /// Who paid
    pub paid_by: ParticipantId,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub split_mode: SplitMode,

    pub shares: Vec<Share>,

    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Check if the given participant paid for or shares this expense
    pub fn involves(&self, participant_id: ParticipantId) -> bool {
        self.paid_by == participant_id
            || self.shares.iter().any(|s| s.participant_id == participant_id)
    }

    /// The share owed by a participant, if any
    pub fn share_of(&self, participant_id: ParticipantId) -> Option<Money> {
        self.shares
            .iter()
            .find(|s| s.participant_id == participant_id)
            .map(|s| s.amount)
    }

    /// Sum of the shares, or `None` if it overflows
    pub fn shares_total(&self) -> Option<Money> {
        Money::checked_sum(self.shares.iter().map(|s| s.amount))
    }

    /// Validate the stored expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.is_within_limit() {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }
        if self.shares.is_empty() {
            return Err(ExpenseValidationError::NoShares);
        }
        match self.shares_total() {
            Some(total) if total == self.amount => Ok(()),
            Some(shares_total) => Err(ExpenseValidationError::SharesMismatch {
                expense_amount: self.amount,
                shares_total,
            }),
            None => Err(ExpenseValidationError::SharesOverflow),
        }
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for stored expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    NoShares,
    SharesOverflow,
    SharesMismatch {
        expense_amount: Money,
        shares_total: Money,
    },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be greater than zero (got {})", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Expense amount {} is above the limit of {}",
                amount,
                Money::MAX_AMOUNT
            ),
            Self::NoShares => write!(f, "Expense must be shared by at least one participant"),
            Self::SharesOverflow => write!(f, "Share amounts are too large to add up"),
            Self::SharesMismatch {
                expense_amount,
                shares_total,
            } => write!(
                f,
                "Share totals ({}) do not match expense amount ({})",
                shares_total, expense_amount
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Balance engine input: the parts of an expense that move money
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub total_amount: Money,
    pub payer_id: ParticipantId,
    pub category_label: Option<String>,
    pub shares: Vec<Share>,
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            total_amount: expense.amount,
            payer_id: expense.paid_by,
            category_label: expense.category.clone(),
            shares: expense.shares.clone(),
        }
    }
}

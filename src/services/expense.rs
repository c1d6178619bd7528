//! Expense service
//!
//! Validates new expenses, derives their shares and keeps the expense list.

use chrono::{Local, NaiveDate, Utc};

use crate::audit::Subject;
use crate::error::{SplitbookError, SplitbookResult};
use crate::ledger::compute_shares;
use crate::models::{Expense, ExpenseId, Money, ParticipantId, ShareInput, SplitMode};
use crate::storage::Storage;

const MAX_DESCRIPTION_LEN: usize = 200;
const MAX_CURRENCY_LEN: usize = 10;

/// Everything needed to record an expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub paid_by: ParticipantId,
    pub split_mode: SplitMode,
    pub shares: Vec<ShareInput>,
    pub currency: String,
    pub category: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        paid_by: ParticipantId,
        split_mode: SplitMode,
        shares: Vec<ShareInput>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by,
            split_mode,
            shares,
            currency: "USD".to_string(),
            category: None,
            date: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new expense
    pub fn add(&self, new: NewExpense) -> SplitbookResult<Expense> {
        let description = new.description.trim().to_string();
        if description.is_empty() {
            return Err(SplitbookError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(SplitbookError::Validation(format!(
                "Expense description too long (max {} characters)",
                MAX_DESCRIPTION_LEN
            )));
        }
        if !new.amount.is_positive() {
            return Err(SplitbookError::Validation(format!(
                "Expense amount must be greater than zero (got {})",
                new.amount
            )));
        }
        if !new.amount.is_within_limit() {
            return Err(SplitbookError::Validation(format!(
                "Expense amount {} is above the limit of {}",
                new.amount,
                Money::MAX_AMOUNT
            )));
        }
        if let Some(input) = new.shares.iter().find(|input| !share_within_limit(input)) {
            return Err(SplitbookError::Validation(format!(
                "Share for {} is out of range",
                input.participant_id
            )));
        }

        let currency = new.currency.trim().to_uppercase();
        if currency.is_empty() || currency.len() > MAX_CURRENCY_LEN {
            return Err(SplitbookError::Validation(format!(
                "Invalid currency '{}'",
                new.currency
            )));
        }

        if self.storage.participants.get(new.paid_by)?.is_none() {
            return Err(SplitbookError::participant_not_found(new.paid_by.to_string()));
        }
        for input in &new.shares {
            if self.storage.participants.get(input.participant_id)?.is_none() {
                return Err(SplitbookError::participant_not_found(
                    input.participant_id.to_string(),
                ));
            }
        }

        let shares = compute_shares(new.amount, new.split_mode, &new.shares)?;

        let category = new
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let expense = Expense {
            id: ExpenseId::new(),
            description,
            amount: new.amount,
            currency,
            paid_by: new.paid_by,
            category,
            split_mode: new.split_mode,
            shares,
            date: new.date.unwrap_or_else(|| Local::now().date_naive()),
            created_at: Utc::now(),
        };
        expense
            .validate()
            .map_err(|e| SplitbookError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(Subject::expense(&expense), &expense)?;

        Ok(expense)
    }

    /// All expenses, newest date first
    pub fn list(&self) -> SplitbookResult<Vec<Expense>> {
        let mut expenses = self.storage.expenses.get_all()?;
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Find an expense by full or short ID
    pub fn find(&self, identifier: &str) -> SplitbookResult<Option<Expense>> {
        Ok(self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .find(|e| e.id.matches(identifier)))
    }

    pub fn get(&self, identifier: &str) -> SplitbookResult<Expense> {
        self.find(identifier)?
            .ok_or_else(|| SplitbookError::expense_not_found(identifier))
    }

    /// Delete an expense
    pub fn delete(&self, identifier: &str) -> SplitbookResult<Expense> {
        let expense = self.get(identifier)?;

        self.storage.expenses.delete(expense.id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(Subject::expense(&expense), &expense)?;

        Ok(expense)
    }

    /// Expenses a participant paid for or shares, newest date first
    pub fn by_participant(&self, participant_id: ParticipantId) -> SplitbookResult<Vec<Expense>> {
        let mut expenses = self.storage.expenses.get_by_participant(participant_id)?;
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }
}

fn share_within_limit(input: &ShareInput) -> bool {
    input.amount.map_or(true, |amount| amount.is_within_limit())
        && input.percent.map_or(true, |percent| percent.is_within_limit())
}

fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

//! Balance service
//!
//! Feeds the stored ledger into the balance engine.

use crate::error::SplitbookResult;
use crate::ledger::compute_balances;
use crate::models::{BalanceReport, ExpenseRecord};
use crate::storage::Storage;

/// Service for balance reports
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Net balances, settlements and category totals for the whole ledger
    pub fn report(&self) -> SplitbookResult<BalanceReport> {
        let participants = self.storage.participants.get_all()?;
        let records: Vec<ExpenseRecord> = self
            .storage
            .expenses
            .get_all()?
            .iter()
            .map(ExpenseRecord::from)
            .collect();

        compute_balances(&participants, &records)
    }
}

//! Ledger-wide operations

use serde::Serialize;

use crate::audit::Subject;
use crate::error::SplitbookResult;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub participants: usize,
    pub expenses: usize,
}

/// Service for whole-ledger operations
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn stats(&self) -> SplitbookResult<LedgerStats> {
        Ok(LedgerStats {
            participants: self.storage.participants.count()?,
            expenses: self.storage.expenses.count()?,
        })
    }

    /// Remove every participant and expense, returning what was there
    pub fn clear(&self) -> SplitbookResult<LedgerStats> {
        let before = self.stats()?;
        self.storage.clear_all()?;

        self.storage
            .log_delete(Subject::ledger(self.storage.ledger()), &before)?;

        Ok(before)
    }
}

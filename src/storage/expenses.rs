//! Expense repository
//!
//! Stores expenses under the `quick_expenses` key, in the order they were
//! recorded.

use std::sync::{Arc, RwLock};

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Expense, ExpenseId, ParticipantId};

use super::kv::{load_json, save_json, KeyValueStore, EXPENSES_KEY};

/// Repository for expense persistence
pub struct ExpenseRepository {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Vec<Expense>>,
}

impl ExpenseRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load expenses from the store
    pub fn load(&self) -> SplitbookResult<()> {
        let loaded: Vec<Expense> = load_json(self.store.as_ref(), EXPENSES_KEY)?;
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = loaded;
        Ok(())
    }

    /// Save expenses to the store
    pub fn save(&self) -> SplitbookResult<()> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        save_json(self.store.as_ref(), EXPENSES_KEY, &*data)
    }

    pub fn get(&self, id: ExpenseId) -> SplitbookResult<Option<Expense>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().find(|e| e.id == id).cloned())
    }

    /// All expenses, in the order they were recorded
    pub fn get_all(&self) -> SplitbookResult<Vec<Expense>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    /// Expenses the participant paid for or has a share in
    pub fn get_by_participant(&self, participant_id: ParticipantId) -> SplitbookResult<Vec<Expense>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data
            .iter()
            .filter(|e| e.involves(participant_id))
            .cloned()
            .collect())
    }

    pub fn upsert(&self, expense: Expense) -> SplitbookResult<()> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        match data.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense,
            None => data.push(expense),
        }
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> SplitbookResult<bool> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let before = data.len();
        data.retain(|e| e.id != id);
        Ok(data.len() != before)
    }

    /// Forget all expenses and drop the stored key
    pub fn clear(&self) -> SplitbookResult<()> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.clear();
        self.store.remove(EXPENSES_KEY)?;
        Ok(())
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

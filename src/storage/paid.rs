//! Paid flag repository
//!
//! Keeps the settlement pairs marked as paid under the `quick_paid` key.

use std::sync::{Arc, RwLock};

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{PaidFlag, ParticipantId};

use super::kv::{load_json, save_json, KeyValueStore, PAID_KEY};

/// Repository for paid flags
pub struct PaidFlagRepository {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Vec<PaidFlag>>,
}

impl PaidFlagRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> SplitbookResult<()> {
        let loaded: Vec<PaidFlag> = load_json(self.store.as_ref(), PAID_KEY)?;
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = loaded;
        Ok(())
    }

    pub fn save(&self) -> SplitbookResult<()> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        save_json(self.store.as_ref(), PAID_KEY, &*data)
    }

    pub fn get_all(&self) -> SplitbookResult<Vec<PaidFlag>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    pub fn is_paid(&self, from: ParticipantId, to: ParticipantId) -> SplitbookResult<bool> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().any(|f| f.is_for(from, to)))
    }

    /// Add a flag; returns false if the pair was already marked
    pub fn mark(&self, flag: PaidFlag) -> SplitbookResult<bool> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        if data.iter().any(|f| f.is_for(flag.from, flag.to)) {
            return Ok(false);
        }
        data.push(flag);
        Ok(true)
    }

    /// Remove the flag for a pair, returning it if there was one
    pub fn unmark(
        &self,
        from: ParticipantId,
        to: ParticipantId,
    ) -> SplitbookResult<Option<PaidFlag>> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(data
            .iter()
            .position(|f| f.is_for(from, to))
            .map(|position| data.remove(position)))
    }

    /// Drop every flag a participant is part of; returns how many went
    pub fn forget_participant(&self, participant_id: ParticipantId) -> SplitbookResult<usize> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let before = data.len();
        data.retain(|f| f.from != participant_id && f.to != participant_id);
        Ok(before - data.len())
    }

    /// Forget all flags and drop the stored key
    pub fn clear(&self) -> SplitbookResult<()> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.clear();
        self.store.remove(PAID_KEY)?;
        Ok(())
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

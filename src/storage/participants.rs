//! Participant repository
//!
//! Keeps participants in insertion order under the `quick_people` key. Order
//! matters: balance totals and settlements follow it.

use std::sync::{Arc, RwLock};

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Participant, ParticipantId};

use super::kv::{load_json, save_json, KeyValueStore, PEOPLE_KEY};

/// Repository for participant persistence
pub struct ParticipantRepository {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Vec<Participant>>,
}

impl ParticipantRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load participants from the store
    pub fn load(&self) -> SplitbookResult<()> {
        let loaded: Vec<Participant> = load_json(self.store.as_ref(), PEOPLE_KEY)?;
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = loaded;
        Ok(())
    }

    /// Save participants to the store
    pub fn save(&self) -> SplitbookResult<()> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        save_json(self.store.as_ref(), PEOPLE_KEY, &*data)
    }

    pub fn get(&self, id: ParticipantId) -> SplitbookResult<Option<Participant>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().find(|p| p.id == id).cloned())
    }

    /// All participants, in the order they were added
    pub fn get_all(&self) -> SplitbookResult<Vec<Participant>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    /// Get a participant by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> SplitbookResult<Option<Participant>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().find(|p| p.has_name(name)).cloned())
    }

    /// Insert a new participant at the end, or replace one in place
    pub fn upsert(&self, participant: Participant) -> SplitbookResult<()> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        match data.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant,
            None => data.push(participant),
        }
        Ok(())
    }

    pub fn delete(&self, id: ParticipantId) -> SplitbookResult<bool> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let before = data.len();
        data.retain(|p| p.id != id);
        Ok(data.len() != before)
    }

    /// Forget all participants and drop the stored key
    pub fn clear(&self) -> SplitbookResult<()> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.clear();
        self.store.remove(PEOPLE_KEY)?;
        Ok(())
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

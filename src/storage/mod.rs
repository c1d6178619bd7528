//! Storage layer for splitbook
//!
//! Each ledger is a small key-value store holding three JSON values: the
//! people, the expenses and the settlements marked as paid. Repositories
//! cache them in memory and write back through the [`KeyValueStore`] trait,
//! so the backend (files or memory) is injected rather than global.

pub mod expenses;
pub mod file_io;
pub mod kv;
pub mod paid;
pub mod participants;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use kv::{FileStore, KeyValueStore, MemoryStore, EXPENSES_KEY, PAID_KEY, PEOPLE_KEY};
pub use paid::PaidFlagRepository;
pub use participants::ParticipantRepository;

use std::sync::Arc;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, Operation, Subject};
use crate::config::paths::SplitbookPaths;
use crate::error::{SplitbookError, SplitbookResult};

/// Main storage coordinator for one ledger
pub struct Storage {
    ledger: String,
    store: Arc<dyn KeyValueStore>,
    audit: Option<AuditLogger>,
    pub participants: ParticipantRepository,
    pub expenses: ExpenseRepository,
    pub paid: PaidFlagRepository,
}

impl Storage {
    /// Create storage for a ledger on top of any key-value backend
    pub fn new(ledger: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ledger: ledger.into(),
            participants: ParticipantRepository::new(store.clone()),
            expenses: ExpenseRepository::new(store.clone()),
            paid: PaidFlagRepository::new(store.clone()),
            store,
            audit: None,
        }
    }

    /// Open a file-backed ledger under the data directory
    pub fn open(paths: &SplitbookPaths, ledger: &str) -> SplitbookResult<Self> {
        paths.ensure_directories()?;
        let dir = paths.ledger_dir(ledger)?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir));
        Ok(Self::new(ledger, store))
    }

    /// A throwaway in-memory ledger
    pub fn in_memory() -> Self {
        Self::new("memory", Arc::new(MemoryStore::new()))
    }

    /// Record every mutation in the given audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn ledger(&self) -> &str {
        &self.ledger
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Load all data from the store
    pub fn load_all(&self) -> SplitbookResult<()> {
        self.participants.load()?;
        self.expenses.load()?;
        self.paid.load()?;
        Ok(())
    }

    /// Save all data to the store
    pub fn save_all(&self) -> SplitbookResult<()> {
        self.participants.save()?;
        self.expenses.save()?;
        self.paid.save()?;
        Ok(())
    }

    /// Drop every participant, expense and paid flag in this ledger
    pub fn clear_all(&self) -> SplitbookResult<()> {
        self.paid.clear()?;
        self.expenses.clear()?;
        self.participants.clear()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(&self, subject: Subject, entity: &T) -> SplitbookResult<()> {
        self.log(Operation::Create, subject, None, Some(entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        subject: Subject,
        before: &T,
        after: &T,
    ) -> SplitbookResult<()> {
        self.log(Operation::Update, subject, Some(before), Some(after))
    }

    pub fn log_delete<T: Serialize>(&self, subject: Subject, entity: &T) -> SplitbookResult<()> {
        self.log(Operation::Delete, subject, Some(entity), None)
    }

    fn log<T: Serialize>(
        &self,
        operation: Operation,
        subject: Subject,
        before: Option<&T>,
        after: Option<&T>,
    ) -> SplitbookResult<()> {
        let Some(logger) = &self.audit else {
            return Ok(());
        };
        let entry = AuditEntry::new(
            &self.ledger,
            operation,
            subject,
            before.map(snapshot).transpose()?,
            after.map(snapshot).transpose()?,
        );
        logger.log(&entry)
    }
}

fn snapshot<T: Serialize>(value: &T) -> SplitbookResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| SplitbookError::Json(format!("Failed to snapshot for audit log: {}", e)))
}

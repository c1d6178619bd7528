//! Participant service
//!
//! Adds, renames and removes the people in a ledger.

use crate::audit::Subject;
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::Participant;
use crate::storage::Storage;

/// Service for participant management
pub struct ParticipantService<'a> {
    storage: &'a Storage,
}

impl<'a> ParticipantService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a new participant
    pub fn add(&self, name: &str) -> SplitbookResult<Participant> {
        let name = name.trim();

        if self.storage.participants.get_by_name(name)?.is_some() {
            return Err(SplitbookError::Duplicate {
                entity_type: "Participant",
                identifier: name.to_string(),
            });
        }

        let participant = Participant::new(name);
        participant
            .validate()
            .map_err(|e| SplitbookError::Validation(e.to_string()))?;

        self.storage.participants.upsert(participant.clone())?;
        self.storage.participants.save()?;

        self.storage
            .log_create(Subject::participant(&participant), &participant)?;

        Ok(participant)
    }

    /// All participants, in the order they were added
    pub fn list(&self) -> SplitbookResult<Vec<Participant>> {
        self.storage.participants.get_all()
    }

    /// Find a participant by name (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> SplitbookResult<Option<Participant>> {
        if let Some(participant) = self.storage.participants.get_by_name(identifier)? {
            return Ok(Some(participant));
        }

        Ok(self
            .storage
            .participants
            .get_all()?
            .into_iter()
            .find(|p| p.id.matches(identifier)))
    }

    /// Like [`find`](Self::find), but a missing participant is an error
    pub fn get(&self, identifier: &str) -> SplitbookResult<Participant> {
        self.find(identifier)?
            .ok_or_else(|| SplitbookError::participant_not_found(identifier))
    }

    /// Rename a participant
    pub fn rename(&self, identifier: &str, new_name: &str) -> SplitbookResult<Participant> {
        let mut participant = self.get(identifier)?;
        let new_name = new_name.trim();

        if let Some(existing) = self.storage.participants.get_by_name(new_name)? {
            if existing.id != participant.id {
                return Err(SplitbookError::Duplicate {
                    entity_type: "Participant",
                    identifier: new_name.to_string(),
                });
            }
        }

        let before = participant.clone();
        participant.name = new_name.to_string();
        participant
            .validate()
            .map_err(|e| SplitbookError::Validation(e.to_string()))?;

        self.storage.participants.upsert(participant.clone())?;
        self.storage.participants.save()?;

        self.storage
            .log_update(Subject::participant(&participant), &before, &participant)?;

        Ok(participant)
    }

    /// Remove a participant that no expense refers to
    pub fn remove(&self, identifier: &str) -> SplitbookResult<Participant> {
        let participant = self.get(identifier)?;

        let used_by = self.storage.expenses.get_by_participant(participant.id)?;
        if !used_by.is_empty() {
            return Err(SplitbookError::InUse {
                entity_type: "Participant",
                identifier: participant.name.clone(),
                count: used_by.len(),
            });
        }

        self.storage.participants.delete(participant.id)?;
        self.storage.participants.save()?;
        if self.storage.paid.forget_participant(participant.id)? > 0 {
            self.storage.paid.save()?;
        }

        self.storage
            .log_delete(Subject::participant(&participant), &participant)?;

        Ok(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogger;
    use crate::models::{Money, ShareInput, SplitMode};
    use crate::services::{ExpenseService, NewExpense};
    use tempfile::TempDir;

    #[test]
    fn test_add_and_list() {
        let storage = Storage::in_memory();
        let service = ParticipantService::new(&storage);

        service.add("  Alice ").unwrap();
        service.add("Bob").unwrap();

        let names: Vec<_> = service.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_add_rejects_empty_and_duplicate() {
        let storage = Storage::in_memory();
        let service = ParticipantService::new(&storage);

        assert!(service.add("   ").unwrap_err().is_validation());

        service.add("Alice").unwrap();
        assert!(matches!(
            service.add("alice"),
            Err(SplitbookError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_find_by_name_or_id() {
        let storage = Storage::in_memory();
        let service = ParticipantService::new(&storage);
        let alice = service.add("Alice").unwrap();

        assert_eq!(service.find("ALICE").unwrap().unwrap().id, alice.id);
        assert_eq!(service.find(&alice.id.short()).unwrap().unwrap().id, alice.id);
        assert_eq!(service.find(&alice.id.to_string()).unwrap().unwrap().id, alice.id);
        assert!(service.find("Nobody").unwrap().is_none());
        assert!(service.get("Nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_rename() {
        let storage = Storage::in_memory();
        let service = ParticipantService::new(&storage);
        service.add("Al").unwrap();
        service.add("Bea").unwrap();

        let renamed = service.rename("al", "Alice").unwrap();
        assert_eq!(renamed.name, "Alice");
        assert!(service.find("Al").unwrap().is_none());

        // Changing only the case of your own name is fine
        service.rename("Alice", "ALICE").unwrap();
        assert!(matches!(
            service.rename("ALICE", "bea"),
            Err(SplitbookError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_rename_is_audited_with_the_changed_name() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.log");
        let storage = Storage::in_memory().with_audit(AuditLogger::new(log_path.clone()));
        let service = ParticipantService::new(&storage);
        service.add("Al").unwrap();
        service.rename("Al", "Alice").unwrap();

        let entries = AuditLogger::new(log_path).read_all().unwrap();
        let changes: Vec<String> = entries[1].changes().iter().map(ToString::to_string).collect();
        assert_eq!(changes, vec!["name: Al -> Alice"]);
        assert_eq!(entries[1].subject.label.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_remove_refused_while_referenced() {
        let storage = Storage::in_memory();
        let service = ParticipantService::new(&storage);
        let alice = service.add("Alice").unwrap();
        service.add("Bob").unwrap();

        ExpenseService::new(&storage)
            .add(NewExpense::new(
                "Coffee",
                Money::from_cents(500),
                alice.id,
                SplitMode::Equal,
                vec![ShareInput::equal(alice.id)],
            ))
            .unwrap();

        assert!(matches!(
            service.remove("Alice"),
            Err(SplitbookError::InUse { count: 1, .. })
        ));

        service.remove("Bob").unwrap();
        assert_eq!(service.list().unwrap().len(), 1);
    }
}

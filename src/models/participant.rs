//! Participant model
//!
//! A person who can pay for an expense or owe a share of one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ParticipantId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,

    /// Display name, unique within a ledger (case-insensitive)
    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new participant
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Normalize a name for case-insensitive comparison
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check whether this participant has the given name (case-insensitive)
    pub fn has_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }

    /// Validate the participant
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(ParticipantValidationError::EmptyName);
        }
        if trimmed.len() > 100 {
            return Err(ParticipantValidationError::NameTooLong(trimmed.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for ParticipantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Participant name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Participant name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for ParticipantValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_participant() {
        let p = Participant::new("Alice");
        assert_eq!(p.name, "Alice");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_has_name_is_case_insensitive() {
        let p = Participant::new("Alice");
        assert!(p.has_name("alice"));
        assert!(p.has_name("  ALICE "));
        assert!(!p.has_name("Alicia"));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Participant::new("   ").validate(),
            Err(ParticipantValidationError::EmptyName)
        );
        assert_eq!(
            Participant::new("x".repeat(101)).validate(),
            Err(ParticipantValidationError::NameTooLong(101))
        );
    }
}

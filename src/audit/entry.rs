//! Audit log entries
//!
//! An entry says which ledger changed, what happened and to which record, and
//! keeps JSON snapshots of the record. Field-level changes are read back out
//! of the snapshots, so callers never describe a change by hand.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Expense, Participant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Kinds of records the log tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Participant,
    Expense,
    /// A paid flag on a suggested payment
    Settlement,
    /// A whole ledger, e.g. when it is cleared
    Ledger,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = match self {
            EntityType::Participant => "person",
            EntityType::Expense => "expense",
            EntityType::Settlement => "settlement",
            EntityType::Ledger => "ledger",
        };
        f.write_str(noun)
    }
}

/// The record an entry is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: EntityType,
    pub id: String,
    /// Name or description at the time of the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Subject {
    pub fn new(kind: EntityType, id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            label: Some(label.into()),
        }
    }

    pub fn participant(participant: &Participant) -> Self {
        Self::new(EntityType::Participant, participant.id.to_string(), &participant.name)
    }

    pub fn expense(expense: &Expense) -> Self {
        Self::new(EntityType::Expense, expense.id.to_string(), &expense.description)
    }

    pub fn ledger(name: &str) -> Self {
        Self {
            kind: EntityType::Ledger,
            id: name.to_string(),
            label: None,
        }
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub ledger: String,
    pub operation: Operation,
    pub subject: Subject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl AuditEntry {
    pub fn new(
        ledger: &str,
        operation: Operation,
        subject: Subject,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            ledger: ledger.to_string(),
            operation,
            subject,
            before,
            after,
        }
    }

    /// Top-level fields that differ between the two snapshots
    ///
    /// Empty unless both snapshots are JSON objects, i.e. for updates.
    pub fn changes(&self) -> Vec<FieldChange> {
        let (Some(Value::Object(before)), Some(Value::Object(after))) = (&self.before, &self.after)
        else {
            return Vec::new();
        };

        after
            .iter()
            .filter_map(|(field, new)| {
                let old = before.get(field).unwrap_or(&Value::Null);
                (old != new).then(|| FieldChange {
                    field: field.clone(),
                    from: old.clone(),
                    to: new.clone(),
                })
            })
            .collect()
    }

    fn verb(&self) -> &'static str {
        match (self.operation, self.subject.kind) {
            (Operation::Create, EntityType::Settlement) => "marked paid",
            (Operation::Delete, EntityType::Settlement) => "unmarked",
            (Operation::Delete, EntityType::Ledger) => "cleared",
            (Operation::Create, _) => "added",
            (Operation::Update, _) => "changed",
            (Operation::Delete, _) => "removed",
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} ",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.ledger,
            self.subject.kind
        )?;
        match &self.subject.label {
            Some(label) => write!(f, "{} ({})", label, self.subject.id)?,
            None => write!(f, "{}", self.subject.id)?,
        }
        write!(f, " {}", self.verb())?;

        for change in self.changes() {
            write!(f, "\n    {}", change)?;
        }
        Ok(())
    }
}

/// A field that changed in an update
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub from: Value,
    pub to: Value,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, plain(&self.from), plain(&self.to))
    }
}

/// Strings without their JSON quotes
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "none".to_string(),
        other => other.to_string(),
    }
}

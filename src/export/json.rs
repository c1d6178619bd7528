//! JSON Export functionality
//!
//! Exports a whole ledger, plus its current balance report, to JSON with
//! schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{BalanceReport, Expense, PaidFlag, Participant};
use crate::services::BalanceService;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub ledger: String,

    pub participants: Vec<Participant>,

    pub expenses: Vec<Expense>,

    /// Settlement pairs marked as paid
    #[serde(default)]
    pub paid: Vec<PaidFlag>,

    /// Balances and settlements at export time
    pub report: BalanceReport,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub participant_count: usize,
    pub expense_count: usize,
    pub earliest_expense: Option<String>,
    pub latest_expense: Option<String>,
}

impl FullExport {
    /// Snapshot a ledger
    pub fn from_storage(storage: &Storage) -> SplitbookResult<Self> {
        let participants = storage.participants.get_all()?;
        let expenses = storage.expenses.get_all()?;
        let report = BalanceService::new(storage).report()?;

        let metadata = ExportMetadata {
            participant_count: participants.len(),
            expense_count: expenses.len(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger: storage.ledger().to_string(),
            participants,
            expenses,
            paid: storage.paid.get_all()?,
            report,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let known: HashSet<_> = self.participants.iter().map(|p| p.id).collect();

        for expense in &self.expenses {
            if !known.contains(&expense.paid_by) {
                return Err(format!(
                    "Expense {} was paid by unknown participant {}",
                    expense.id, expense.paid_by
                ));
            }
            if let Some(share) = expense
                .shares
                .iter()
                .find(|s| !known.contains(&s.participant_id))
            {
                return Err(format!(
                    "Expense {} has a share for unknown participant {}",
                    expense.id, share.participant_id
                ));
            }
            expense
                .validate()
                .map_err(|e| format!("Expense {}: {}", expense.id, e))?;
        }

        Ok(())
    }
}

/// Export a ledger to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> SplitbookResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| SplitbookError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, ShareInput, SplitMode};
    use crate::services::{ExpenseService, NewExpense, ParticipantService, SettlementService};

    fn populated() -> Storage {
        let storage = Storage::in_memory();
        let people = ParticipantService::new(&storage);
        let ana = people.add("Ana").unwrap().id;
        let ben = people.add("Ben").unwrap().id;
        ExpenseService::new(&storage)
            .add(NewExpense::new(
                "Groceries",
                Money::from_cents(4000),
                ana,
                SplitMode::Equal,
                vec![ShareInput::equal(ana), ShareInput::equal(ben)],
            ))
            .unwrap();
        storage
    }

    #[test]
    fn test_snapshot_contents() {
        let storage = populated();
        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.ledger, "memory");
        assert_eq!(export.metadata.participant_count, 2);
        assert_eq!(export.metadata.expense_count, 1);
        assert_eq!(export.report.settlements.len(), 1);
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_output_parses_back() {
        let storage = populated();
        let mut buffer = Vec::new();
        export_full_json(&storage, &mut buffer, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.participants.len(), 2);
        assert_eq!(parsed.expenses[0].description, "Groceries");
        assert_eq!(parsed.report.settlements[0].amount, Money::from_cents(2000));
        assert!(parsed.paid.is_empty());
    }

    #[test]
    fn test_paid_flags_are_exported() {
        let storage = populated();
        SettlementService::new(&storage).mark_paid("Ben", "Ana").unwrap();

        let export = FullExport::from_storage(&storage).unwrap();
        assert_eq!(export.paid.len(), 1);
        assert_eq!(export.paid[0].to, export.participants[0].id);
    }

    #[test]
    fn test_validate_catches_orphan_expense() {
        let storage = populated();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.participants.remove(1);
        assert!(export.validate().unwrap_err().contains("unknown participant"));

        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();
        assert!(export.validate().is_err());
    }
}

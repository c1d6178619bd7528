//! Settlement service
//!
//! Marks suggested payments as paid. A flag can only be set on a payment the
//! current balance report actually suggests, but it can always be removed.

use crate::audit::{EntityType, Subject};
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{BalanceReport, PaidFlag, Participant, Settlement, SettlementStatus};
use crate::storage::Storage;

use super::{BalanceService, ParticipantService};

/// Service for paid flags on settlements
pub struct SettlementService<'a> {
    storage: &'a Storage,
}

impl<'a> SettlementService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The balance report plus each of its settlements with its paid flag
    pub fn report(&self) -> SplitbookResult<(BalanceReport, Vec<SettlementStatus>)> {
        let report = BalanceService::new(self.storage).report()?;
        let statuses = report.settlement_statuses(&self.storage.paid.get_all()?);
        Ok((report, statuses))
    }

    /// Mark the payment from one person to another as paid
    pub fn mark_paid(&self, from: &str, to: &str) -> SplitbookResult<Settlement> {
        let (from, to) = self.pair(from, to)?;

        let report = BalanceService::new(self.storage).report()?;
        let settlement = report
            .settlements
            .iter()
            .find(|s| s.from == from.id && s.to == to.id)
            .cloned()
            .ok_or_else(|| {
                SplitbookError::Validation(format!(
                    "No payment from {} to {} is needed",
                    from.name, to.name
                ))
            })?;

        let flag = PaidFlag::new(from.id, to.id);
        if !self.storage.paid.mark(flag.clone())? {
            return Err(SplitbookError::Validation(format!(
                "{} -> {} is already marked as paid",
                from.name, to.name
            )));
        }
        self.storage.paid.save()?;

        self.storage.log_create(subject(&from, &to), &flag)?;

        Ok(settlement)
    }

    /// Clear the paid flag between two people
    pub fn unmark_paid(&self, from: &str, to: &str) -> SplitbookResult<PaidFlag> {
        let (from, to) = self.pair(from, to)?;

        let flag = self.storage.paid.unmark(from.id, to.id)?.ok_or_else(|| {
            SplitbookError::Validation(format!(
                "{} -> {} is not marked as paid",
                from.name, to.name
            ))
        })?;
        self.storage.paid.save()?;

        self.storage.log_delete(subject(&from, &to), &flag)?;

        Ok(flag)
    }

    fn pair(&self, from: &str, to: &str) -> SplitbookResult<(Participant, Participant)> {
        let people = ParticipantService::new(self.storage);
        Ok((people.get(from)?, people.get(to)?))
    }
}

fn subject(from: &Participant, to: &Participant) -> Subject {
    Subject::new(
        EntityType::Settlement,
        format!("{}->{}", from.id, to.id),
        format!("{} -> {}", from.name, to.name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::models::{Money, ShareInput, SplitMode};
    use crate::services::{ExpenseService, NewExpense};
    use tempfile::TempDir;

    /// Ana pays 30.00 for three: Ben and Cy each owe her 10.00
    fn trip(storage: &Storage) {
        let people = ParticipantService::new(storage);
        let ana = people.add("Ana").unwrap().id;
        let ben = people.add("Ben").unwrap().id;
        let cy = people.add("Cy").unwrap().id;
        ExpenseService::new(storage)
            .add(NewExpense::new(
                "Taxi",
                Money::from_cents(3000),
                ana,
                SplitMode::Equal,
                vec![ShareInput::equal(ana), ShareInput::equal(ben), ShareInput::equal(cy)],
            ))
            .unwrap();
    }

    #[test]
    fn test_mark_and_unmark() {
        let storage = Storage::in_memory();
        trip(&storage);
        let service = SettlementService::new(&storage);

        let settlement = service.mark_paid("ben", "Ana").unwrap();
        assert_eq!(settlement.amount, Money::from_cents(1000));

        let (report, statuses) = service.report().unwrap();
        let paid: Vec<bool> = statuses.iter().map(|s| s.paid).collect();
        assert_eq!(paid, vec![true, false]);
        assert_eq!(report.settlements.len(), 2);

        service.unmark_paid("Ben", "Ana").unwrap();
        assert!(service.report().unwrap().1.iter().all(|s| !s.paid));
    }

    #[test]
    fn test_mark_rejects_pairs_without_a_payment() {
        let storage = Storage::in_memory();
        trip(&storage);
        let service = SettlementService::new(&storage);

        assert!(service.mark_paid("Ana", "Ben").unwrap_err().is_validation());
        assert!(service.mark_paid("Ben", "Cy").unwrap_err().is_validation());
        assert!(service.mark_paid("Ben", "Zed").unwrap_err().is_not_found());

        service.mark_paid("Cy", "Ana").unwrap();
        assert!(service.mark_paid("Cy", "Ana").unwrap_err().is_validation());
        assert!(service.unmark_paid("Ben", "Ana").unwrap_err().is_validation());
    }

    #[test]
    fn test_flags_persist_and_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.log");
        let storage = Storage::in_memory().with_audit(AuditLogger::new(log_path.clone()));
        trip(&storage);

        SettlementService::new(&storage).mark_paid("Ben", "Ana").unwrap();
        storage.paid.load().unwrap();
        assert_eq!(storage.paid.count().unwrap(), 1);

        SettlementService::new(&storage).unmark_paid("Ben", "Ana").unwrap();

        let entries = AuditLogger::new(log_path).read_all().unwrap();
        let settlement_ops: Vec<Operation> = entries
            .iter()
            .filter(|e| e.subject.kind == EntityType::Settlement)
            .map(|e| e.operation)
            .collect();
        assert_eq!(settlement_ops, vec![Operation::Create, Operation::Delete]);
        assert_eq!(entries.last().unwrap().subject.label.as_deref(), Some("Ben -> Ana"));
    }
}

//! Audit logging for splitbook
//!
//! Every change to people, expenses, paid flags and whole ledgers is appended
//! to a line-delimited JSON log together with before/after snapshots. This is
//! the application's activity log; `splitbook history` prints it.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, FieldChange, Operation, Subject};
pub use logger::AuditLogger;

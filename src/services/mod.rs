//! Service layer for splitbook
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, share derivation, balance reports, paid flags and
//! audit logging.

pub mod balance;
pub mod expense;
pub mod ledger;
pub mod participant;
pub mod settlement;

pub use balance::BalanceService;
pub use expense::{ExpenseService, NewExpense};
pub use ledger::{LedgerService, LedgerStats};
pub use participant::ParticipantService;
pub use settlement::SettlementService;

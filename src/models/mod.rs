//! Core data models for splitbook
//!
//! This module contains the data structures of the expense-splitting domain:
//! participants, expenses with their shares, the balance report and the
//! paid flags on its settlements.

pub mod balance;
pub mod expense;
pub mod ids;
pub mod money;
pub mod participant;

pub use balance::{
    BalanceReport, BalanceTotal, CategoryTotal, PaidFlag, Settlement, SettlementStatus,
    UNCATEGORIZED,
};
pub use expense::{Expense, ExpenseRecord, Share, ShareInput, SplitMode};
pub use ids::{ExpenseId, ParticipantId};
pub use money::{Money, Percent};
pub use participant::Participant;

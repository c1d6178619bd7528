//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod balance;
pub mod config;
pub mod expense;
pub mod export;
pub mod ledger;
pub mod participant;
pub mod settle;

pub use balance::{handle_balance_command, BalanceArgs};
pub use config::{handle_config_command, ConfigCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportArgs};
pub use ledger::{handle_clear_command, handle_history_command, handle_ledgers_command};
pub use participant::{handle_person_command, PersonCommands};
pub use settle::{handle_settle_command, SettleCommands};

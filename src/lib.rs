//! splitbook - split shared expenses and work out who pays whom
//!
//! This library provides the core of the splitbook command-line tool: record
//! what each person in a group paid, derive everyone's share, and reduce the
//! resulting balances to a short list of payments.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `ledger`: The pure calculators, [`ledger::compute_shares`] and
//!   [`ledger::compute_balances`]
//! - `models`: Core data models (money, participants, expenses, reports)
//! - `storage`: Key-value storage layer, one store per ledger
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `config`: Configuration and path management
//! - `display`, `export`, `cli`: Presentation and the command-line surface
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust
//! use splitbook::ledger::{compute_balances, compute_shares};
//! use splitbook::models::{ExpenseRecord, Money, Participant, ShareInput, SplitMode};
//!
//! let ana = Participant::new("Ana");
//! let ben = Participant::new("Ben");
//!
//! let shares = compute_shares(
//!     Money::from_cents(3000),
//!     SplitMode::Equal,
//!     &[ShareInput::equal(ana.id), ShareInput::equal(ben.id)],
//! )?;
//!
//! let record = ExpenseRecord {
//!     total_amount: Money::from_cents(3000),
//!     payer_id: ana.id,
//!     category_label: None,
//!     shares,
//! };
//!
//! let report = compute_balances(&[ana.clone(), ben.clone()], &[record])?;
//! assert_eq!(report.settlements[0].from, ben.id);
//! assert_eq!(report.settlements[0].amount, Money::from_cents(1500));
//! # Ok::<(), splitbook::SplitbookError>(())
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::SplitbookError;

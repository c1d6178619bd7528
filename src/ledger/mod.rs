//! The splitting core
//!
//! Two pure computations with no I/O:
//!
//! - [`compute_shares`] runs when an expense is created and turns a total
//!   into per-participant shares.
//! - [`compute_balances`] runs whenever balances are viewed and turns stored
//!   shares into net balances, settlements and category totals.
//!
//! Both round money the same way (half away from zero, to the cent) so their
//! results always reconcile.

pub mod balance;
pub mod split;

pub use balance::compute_balances;
pub use split::compute_shares;

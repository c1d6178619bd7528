//! Export module for splitbook
//!
//! - CSV: settlements, per-person totals or expenses (spreadsheet-compatible)
//! - JSON: machine-readable snapshot of a ledger with its balance report
//! - YAML: the same snapshot, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_expenses_csv, export_settlements_csv, export_totals_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;

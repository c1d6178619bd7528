//! CLI command for data export
//!
//! Writes to a file with `--output`, otherwise to stdout.

use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::{SplitbookError, SplitbookResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (one table, see --data)
    Csv,
    /// JSON format (full ledger snapshot)
    Json,
    /// YAML format (full ledger snapshot, human-readable)
    Yaml,
}

/// Which table a CSV export contains
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum CsvData {
    #[default]
    Settlements,
    Totals,
    Expenses,
}

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(value_enum)]
    pub format: ExportFormat,

    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Table to export for CSV
    #[arg(long, value_enum, default_value = "settlements")]
    pub data: CsvData,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle the export command
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> SplitbookResult<()> {
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                SplitbookError::Export(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    };

    match args.format {
        ExportFormat::Csv => match args.data {
            CsvData::Settlements => csv::export_settlements_csv(storage, &mut writer)?,
            CsvData::Totals => csv::export_totals_csv(storage, &mut writer)?,
            CsvData::Expenses => csv::export_expenses_csv(storage, &mut writer)?,
        },
        ExportFormat::Json => {
            json::export_full_json(storage, &mut writer, args.pretty)?;
            writeln!(writer).map_err(|e| SplitbookError::Export(e.to_string()))?;
        }
        ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| SplitbookError::Export(e.to_string()))?;

    if let Some(path) = args.output {
        println!(
            "Ledger '{}' exported to: {}",
            storage.ledger(),
            path.display()
        );
    }

    Ok(())
}

//! YAML Export functionality
//!
//! Same snapshot as the JSON export, in a human-readable form.

use std::io::Write;

use crate::error::{SplitbookError, SplitbookResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export a ledger to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> SplitbookResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# splitbook ledger export: {}\n# Generated: {}\n# App Version: {}\n\n",
        export.ledger, export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| SplitbookError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| SplitbookError::Export(e.to_string()))?;

    Ok(())
}

//! Ledger-level CLI commands: clear, ledgers, history

use crate::audit::AuditLogger;
use crate::config::paths::SplitbookPaths;
use crate::error::SplitbookResult;
use crate::services::LedgerService;
use crate::storage::Storage;

/// Remove every person and expense from the current ledger
pub fn handle_clear_command(storage: &Storage, force: bool) -> SplitbookResult<()> {
    let service = LedgerService::new(storage);

    if !force {
        let stats = service.stats()?;
        println!(
            "About to clear ledger '{}': {} people, {} expenses",
            storage.ledger(),
            stats.participants,
            stats.expenses
        );
        println!("Use --force to confirm");
        return Ok(());
    }

    let cleared = service.clear()?;
    println!(
        "Cleared ledger '{}' ({} people, {} expenses removed)",
        storage.ledger(),
        cleared.participants,
        cleared.expenses
    );
    Ok(())
}

/// List the ledgers on disk, marking the active one
pub fn handle_ledgers_command(paths: &SplitbookPaths, active: &str) -> SplitbookResult<()> {
    let ledgers = paths.list_ledgers()?;
    if ledgers.is_empty() {
        println!("No ledgers yet. The first command that records data creates '{}'.", active);
        return Ok(());
    }

    for name in ledgers {
        let marker = if name == active { "*" } else { " " };
        println!("{} {}", marker, name);
    }
    Ok(())
}

/// Print recent audit log entries
pub fn handle_history_command(
    paths: &SplitbookPaths,
    ledger: Option<&str>,
    limit: usize,
) -> SplitbookResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(limit, ledger)?;

    if entries.is_empty() {
        println!("No history recorded.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry);
    }
    Ok(())
}

//! Path management for splitbook
//!
//! ## Path Resolution Order
//!
//! 1. `SPLITBOOK_DATA_DIR` environment variable (if set)
//! 2. The platform data directory from `directories`
//!    (`~/.local/share/splitbook`, `~/Library/Application Support/splitbook`,
//!    `%APPDATA%\splitbook\data`)
//!
//! Layout under the base directory:
//!
//! ```text
//! config.json
//! audit.log
//! ledgers/<name>/quick_people.json
//! ledgers/<name>/quick_expenses.json
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SplitbookError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "SPLITBOOK_DATA_DIR";

/// Manages all paths used by splitbook
#[derive(Debug, Clone)]
pub struct SplitbookPaths {
    base_dir: PathBuf,
}

impl SplitbookPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SplitbookError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "splitbook")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    SplitbookError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Directory holding one sub-directory per ledger
    pub fn ledgers_dir(&self) -> PathBuf {
        self.base_dir.join("ledgers")
    }

    /// Directory of a single ledger
    ///
    /// Ledger names are restricted to letters, digits, `-` and `_`.
    pub fn ledger_dir(&self, name: &str) -> Result<PathBuf, SplitbookError> {
        validate_ledger_name(name)?;
        Ok(self.ledgers_dir().join(name))
    }

    /// Names of all ledgers that exist on disk, sorted
    pub fn list_ledgers(&self) -> Result<Vec<String>, SplitbookError> {
        let dir = self.ledgers_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Ensure the base and ledgers directories exist
    pub fn ensure_directories(&self) -> Result<(), SplitbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SplitbookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.ledgers_dir()).map_err(|e| {
            SplitbookError::Io(format!("Failed to create ledgers directory: {}", e))
        })?;

        Ok(())
    }
}

/// Check that a ledger name is safe to use as a directory name
pub fn validate_ledger_name(name: &str) -> Result<(), SplitbookError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SplitbookError::Validation(format!(
            "Invalid ledger name '{}': use letters, digits, '-' or '_'",
            name
        )))
    }
}

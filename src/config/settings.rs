//! User settings for splitbook
//!
//! Stored as `config.json` in the base directory. Every field has a default so
//! older or hand-edited files keep loading.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::SplitbookPaths;
use crate::error::SplitbookError;
use crate::storage::{read_json, write_json_atomic};

/// User settings for splitbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency label given to new expenses (e.g. "USD"); never converted
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Symbol used when printing amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Ledger used when `--ledger` is not given
    #[serde(default = "default_ledger")]
    pub default_ledger: String,

    /// Whether mutations are written to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_ledger() -> String {
    "default".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: default_currency(),
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
            default_ledger: default_ledger(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    ///
    /// Defaults are not written back; call [`Settings::save`] for that.
    pub fn load_or_create(paths: &SplitbookPaths) -> Result<Self, SplitbookError> {
        read_json(paths.settings_file()).map_err(|e| {
            SplitbookError::Config(format!("Failed to load settings: {}", e))
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SplitbookPaths) -> Result<(), SplitbookError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Update one setting from its key and a string value
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SplitbookError> {
        match key {
            "default_currency" => self.default_currency = non_empty(key, value)?,
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "date_format" => {
                let format = non_empty(key, value)?;
                if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
                    return Err(SplitbookError::Validation(format!(
                        "Invalid date format '{}'",
                        format
                    )));
                }
                self.date_format = format;
            }
            "default_ledger" => {
                super::paths::validate_ledger_name(value)?;
                self.default_ledger = value.to_string();
            }
            "audit_enabled" => {
                self.audit_enabled = value.parse().map_err(|_| {
                    SplitbookError::Validation(format!(
                        "audit_enabled must be true or false, got '{}'",
                        value
                    ))
                })?
            }
            other => {
                return Err(SplitbookError::Config(format!("Unknown setting '{}'", other)))
            }
        }
        Ok(())
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, SplitbookError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SplitbookError::Validation(format!("{} cannot be empty", key)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_currency, "USD");
        assert_eq!(settings.default_ledger, "default");
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set("default_currency", "EUR").unwrap();
        settings.set("currency_symbol", "€").unwrap();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"default_ledger": "trip"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_ledger, "trip");
        assert_eq!(loaded.currency_symbol, "$");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("default_ledger", "no spaces").is_err());
        assert!(settings.set("audit_enabled", "maybe").is_err());
        assert!(settings.set("colour", "blue").is_err());
        assert!(settings.set("date_format", "%Q").is_err());
        settings.set("date_format", "%d/%m/%Y").unwrap();
        settings.set("audit_enabled", "false").unwrap();
        assert!(!settings.audit_enabled);
    }
}

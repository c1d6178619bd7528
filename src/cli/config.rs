//! Config CLI commands

use clap::Subcommand;

use crate::config::paths::SplitbookPaths;
use crate::config::settings::Settings;
use crate::error::SplitbookResult;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,
    /// Change a setting
    Set {
        /// default_currency, currency_symbol, date_format, default_ledger or audit_enabled
        key: String,
        value: String,
    },
}

/// Handle a config command; no subcommand means `show`
pub fn handle_config_command(
    paths: &SplitbookPaths,
    settings: &mut Settings,
    active_ledger: &str,
    cmd: Option<ConfigCommands>,
) -> SplitbookResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            println!("splitbook Configuration");
            println!("=======================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Active ledger:    {}", active_ledger);
            println!();
            println!("Settings:");
            println!("  default_currency: {}", settings.default_currency);
            println!("  currency_symbol:  {}", settings.currency_symbol);
            println!("  date_format:      {}", settings.date_format);
            println!("  default_ledger:   {}", settings.default_ledger);
            println!("  audit_enabled:    {}", settings.audit_enabled);
        }
        ConfigCommands::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }
    }
    Ok(())
}

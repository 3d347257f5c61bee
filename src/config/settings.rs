//! Persisted settings for hearth-ledger
//!
//! Covers display preferences and the admin passphrase hash used by
//! the authorization gate.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};

/// User settings, stored as config.json in the base directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when formatting amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Argon2 PHC hash of the admin passphrase; None until `init` sets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_passphrase_hash: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            admin_passphrase_hash: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if no file exists yet
    pub fn load_or_create(paths: &LedgerPaths) -> LedgerResult<Self> {
        let path = paths.settings_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Invalid settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> LedgerResult<()> {
        paths.ensure_directories()?;

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.settings_file(), json)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert!(settings.admin_passphrase_hash.is_none());
    }

    #[test]
    fn test_load_missing_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "KES ".to_string();
        settings.admin_passphrase_hash = Some("$argon2id$stub".to_string());
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "KES ");
        assert_eq!(loaded.admin_passphrase_hash.as_deref(), Some("$argon2id$stub"));
    }
}

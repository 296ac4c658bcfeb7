use crate::export::{format_amount, Exporter, DEFAULT_CURRENCY_SYMBOL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from `<config_dir>/hectare/config.toml`. CLI flags override it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load config from default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load config from an explicit path; a missing file means defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(Self::config_path()?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("hectare");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Registry snapshot to load when `--data` isn't given
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Wallet address whose portfolio `hectare portfolio` shows by default
    pub viewer_address: Option<String>,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl DisplayConfig {
    /// Abbreviated amount in the configured currency
    pub fn money(&self, amount: u64) -> String {
        format_amount(amount, &self.currency_symbol)
    }

    pub fn exporter(&self) -> Exporter {
        Exporter::new(self.currency_symbol.as_str())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            viewer_address: None,
            currency_symbol: default_currency_symbol(),
        }
    }
}

//! # Session Configuration
//!
//! Where the session keeps its data and how it displays money.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MARKET_DB_PATH=/tmp/market.db                                      │
//! │     MARKET_DATA_DIR=/var/lib/market                                    │
//! │     MARKET_CURRENCY_SYMBOL=R$                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/market-cart/session.toml (Linux)                         │
//! │     ~/Library/Application Support/app.market.cart/session.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, "R$", 2 decimals                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! data_dir = "/var/lib/market"   # market.db is created inside
//! # database_path = "/tmp/market.db"  # overrides data_dir
//!
//! [display]
//! currency_symbol = "R$"
//! decimal_separator = "."
//! ```

use directories::ProjectDirs;
use market_core::Money;
use market_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the local database lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding `market.db`. Default: the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Full path to the database file. Wins over `data_dir`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Keep everything in memory (nothing survives a restart).
    #[serde(default)]
    pub in_memory: bool,
}

// =============================================================================
// Display Settings
// =============================================================================

/// How amounts are shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

fn default_currency_symbol() -> String {
    market_core::money::CURRENCY_SYMBOL.to_string()
}

fn default_decimal_separator() -> char {
    '.'
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl SessionConfig {
    /// Configuration for tests: in-memory storage, default display.
    pub fn in_memory() -> Self {
        SessionConfig {
            storage: StorageSettings {
                in_memory: true,
                ..StorageSettings::default()
            },
            display: DisplaySettings::default(),
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (session.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, toml::to_string_pretty(self)?)?;

        info!(?path, "Session config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.display.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("currency_symbol must not be empty".into()));
        }

        if self.display.decimal_separator.is_ascii_digit() {
            return Err(ConfigError::Invalid(
                "decimal_separator must not be a digit".into(),
            ));
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database_path must not be empty".into()));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("MARKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("MARKET_DATA_DIR") {
            debug!(dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(symbol) = std::env::var("MARKET_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("app", "market", "cart")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("session.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Storage configuration derived from these settings.
    ///
    /// ## Errors
    /// `Invalid` when no path is configured and the platform has no data dir.
    pub fn storage_config(&self) -> ConfigResult<StorageConfig> {
        if self.storage.in_memory {
            return Ok(StorageConfig::in_memory());
        }

        if let Some(path) = &self.storage.database_path {
            return Ok(StorageConfig::new(path));
        }

        let data_dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => Self::project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| ConfigError::Invalid("Could not determine app data directory".into()))?,
        };

        Ok(StorageConfig::in_dir(data_dir))
    }

    /// Formats an amount for display, e.g. `R$ 12.34`.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{} {}{}{:02}",
            sign,
            self.display.currency_symbol,
            amount.major().abs(),
            self.display.decimal_separator,
            amount.minor()
        )
    }
}

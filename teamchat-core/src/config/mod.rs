//! Configuration management
//!
//! TOML-backed configuration with defaults and validation. Durations are
//! written in human-readable form (`10m`, `2s`) via `humantime_serde`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Identity and approval configuration
    pub identity: IdentityConfig,

    /// Messaging configuration
    pub messaging: MessagingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory for the SQLite database
    pub data_dir: PathBuf,

    /// Keep all state in memory instead of on disk
    pub in_memory: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

/// Identity and approval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Approve fresh signups automatically after `auto_approve_delay`
    pub auto_approve: bool,

    /// Delay before an automatic approval becomes due
    #[serde(with = "humantime_serde")]
    pub auto_approve_delay: Duration,

    /// Seed the store with demo users, groups and messages on first run
    pub seed_demo_data: bool,
}

/// Messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Minimum elapsed time between two sends by the same user
    #[serde(with = "humantime_serde")]
    pub cooldown_window: Duration,

    /// Maximum number of mention autocomplete suggestions
    pub mention_suggestion_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            in_memory: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            auto_approve: true,
            auto_approve_delay: Duration::from_secs(2),
            seed_demo_data: true,
        }
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            cooldown_window: Duration::from_secs(10 * 60),
            mention_suggestion_limit: 5,
        }
    }
}

impl StorageConfig {
    /// Path of the SQLite database file inside the data directory
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("teamchat.db")
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging
            .level
            .parse::<crate::logging::LogLevel>()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        if self.messaging.mention_suggestion_limit == 0 {
            return Err(ConfigError::ValidationFailed(
                "mention_suggestion_limit must be at least 1".to_string(),
            ));
        }

        if self.storage.data_dir.as_os_str().is_empty() && !self.storage.in_memory {
            return Err(ConfigError::ValidationFailed(
                "data_dir must be set for on-disk storage".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))
    }
}

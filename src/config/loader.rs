use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::channel::MAX_CAPACITY;
use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/countersync/config.toml` on Unix,
    /// or the platform equivalent via `dirs::config_dir()`.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("countersync").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - Missing file ⇒ `Config::default()`.
    /// - Otherwise parses TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Namespace and key are non-empty
    /// - Broadcast capacity is between 1 and `MAX_CAPACITY`
    /// - Widget instance ids are unique
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.namespace.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "store.namespace must not be empty".to_string(),
            });
        }

        if self.store.key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "store.key must not be empty".to_string(),
            });
        }

        if self.broadcast.capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "broadcast.capacity must be greater than zero".to_string(),
            });
        }

        if self.broadcast.capacity > MAX_CAPACITY {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "broadcast.capacity must be at most {} (got {})",
                    MAX_CAPACITY, self.broadcast.capacity
                ),
            });
        }

        let mut seen = HashSet::new();
        for id in &self.widget.instances {
            if !seen.insert(id) {
                return Err(ConfigError::ValidationError {
                    message: format!("Duplicate widget instance id {}", id),
                });
            }
        }

        Ok(())
    }
}

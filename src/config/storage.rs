//! Configuration Storage
//!
//! This module loads the persistent configuration file and applies
//! environment overrides on top of it.

use crate::error::{ChatSheetError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Default SQLite store location
const DEFAULT_STORE_PATH: &str = "chat_sheet.db";

/// Default error log location
const DEFAULT_LOG_PATH: &str = "error_log.txt";

/// Default chat model
const DEFAULT_MODEL: &str = "gpt-4";

/// Default timeout for model requests (in seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding the store location
pub const ENV_STORE_PATH: &str = "CHAT_SHEET_DB";
/// Environment variable overriding the error log location
pub const ENV_LOG_PATH: &str = "CHAT_SHEET_LOG";
/// Environment variable holding the model credential
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model name
pub const ENV_MODEL: &str = "CHAT_SHEET_MODEL";
/// Environment variable overriding the API base URL
pub const ENV_API_BASE: &str = "OPENAI_API_BASE";

/// Application configuration
///
/// Passed explicitly to every component at construction; nothing reads
/// process-wide state after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub store_path: PathBuf,
    /// Append-only error log file
    pub log_path: PathBuf,
    /// Credential for the model provider
    pub api_key: Option<String>,
    /// Chat model identifier
    pub model: String,
    /// Custom chat completions endpoint
    pub api_base: Option<String>,
    /// Request timeout for the model provider
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration rooted in a directory, used for isolated sessions
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            store_path: dir.join(DEFAULT_STORE_PATH),
            log_path: dir.join(DEFAULT_LOG_PATH),
            ..Self::default()
        }
    }

    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("chat-sheet"))
            .ok_or_else(|| {
                ChatSheetError::Config("Could not find configuration directory".to_string())
            })
    }

    /// Get the configuration file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load the configuration file from the platform config directory,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_file()?)?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Load configuration from a specific file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup(ENV_STORE_PATH) {
            self.store_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_LOG_PATH) {
            self.log_path = PathBuf::from(path);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = Some(base);
        }
        self
    }

    /// Whether a model credential is available
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

//! Configuration management for the Lacework SDK

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::search::{V2_API_MAX_SEARCH_HISTORY_DAYS, V2_API_MAX_SEARCH_WINDOW_DAYS};
use crate::error::{ConfigError, Result};

/// Environment variables that override values read from the config file
pub const ENV_ACCOUNT: &str = "LW_ACCOUNT";
pub const ENV_SUBACCOUNT: &str = "LW_SUBACCOUNT";
pub const ENV_API_KEY: &str = "LW_API_KEY";
pub const ENV_API_SECRET: &str = "LW_API_SECRET";

/// SDK configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Lacework account name (the `<account>` in `<account>.lacework.net`)
    #[serde(default)]
    pub account: String,

    /// Sub-account to scope requests to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,

    /// API access key ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API secret key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,

    /// Override for the API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Windowed search limits
    #[serde(default)]
    pub search: SearchSettings,
}

/// Limits applied to windowed searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Maximum number of days a single search request may span
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Maximum number of days of history the backend retains
    #[serde(default = "default_max_history_days")]
    pub max_history_days: u32,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_window_days() -> u32 {
    V2_API_MAX_SEARCH_WINDOW_DAYS
}

fn default_max_history_days() -> u32 {
    V2_API_MAX_SEARCH_HISTORY_DAYS
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            max_history_days: default_max_history_days(),
        }
    }
}

impl Config {
    /// Create a config for an account with default settings
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            timeout_secs: default_timeout_secs(),
            ..Default::default()
        }
    }

    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".lacework").join("config.yaml"))
    }

    /// Load configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Self::default_path()?)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Override file values with any `LW_*` variables returned by `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(account) = lookup(ENV_ACCOUNT) {
            self.account = account;
        }
        if let Some(subaccount) = lookup(ENV_SUBACCOUNT) {
            self.subaccount = Some(subaccount);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(secret) = lookup(ENV_API_SECRET) {
            self.api_secret = Some(secret);
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, contents)?;

        // Credentials live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Validate that the configuration can build a working client
    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty() {
            return Err(ConfigError::MissingAccount.into());
        }
        if self.api_key.is_none() || self.api_secret.is_none() {
            return Err(ConfigError::MissingApiKeys.into());
        }
        self.search.validate()
    }
}

impl SearchSettings {
    /// Check the window/history invariant ahead of any search
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(
                ConfigError::Invalid("search.window_days must be positive".to_string()).into(),
            );
        }
        if self.window_days > self.max_history_days {
            return Err(ConfigError::Invalid(format!(
                "search.window_days ({}) cannot be greater than search.max_history_days ({})",
                self.window_days, self.max_history_days
            ))
            .into());
        }
        Ok(())
    }
}

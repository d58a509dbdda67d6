//! User settings and preferences
//!
//! Manages application settings stored in ~/.vizmongo/config.toml

use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;
use crate::dispatch::DeliveryPolicy;
use crate::error::ConfigResult;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default page size for document queries
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// How long to wait for a connection before giving up
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// When true, messages addressed to a target that no longer exists
    /// are logged before being dropped
    #[serde(default = "default_true")]
    pub log_dropped_messages: bool,
}

fn default_page_size() -> u64 {
    50
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            connect_timeout_secs: default_connect_timeout(),
            log_dropped_messages: default_true(),
        }
    }
}

impl Settings {
    /// Stale-target policy for the dispatch channel
    pub fn delivery_policy(&self) -> DeliveryPolicy {
        if self.log_dropped_messages {
            DeliveryPolicy::Log
        } else {
            DeliveryPolicy::Silent
        }
    }
}

/// Load settings from config file
pub fn load_settings() -> ConfigResult<Settings> {
    let path = ConnectionConfig::config_dir()?.join("config.toml");
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| crate::error::ConfigError::NotFound(e.to_string()))?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

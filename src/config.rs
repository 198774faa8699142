//! Configuration loading and management
//!
//! Handles parsing of `.vcc.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote API endpoint configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Snapshot synchronization configuration
    #[serde(default)]
    pub sync: SyncConfig,

    /// Briefing archive configuration
    #[serde(default)]
    pub briefings: BriefingsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            sync: SyncConfig::default(),
            briefings: BriefingsConfig::default(),
        }
    }
}

/// Remote API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the Vector Tasks API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the push channel endpoint on the same host
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_ws_path() -> String {
    "/ws".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_path: default_ws_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// Push channel URL derived from the base URL (`http` -> `ws`).
    pub fn ws_url(&self) -> Result<String> {
        let base = self.base_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return Err(Error::InvalidConfig(format!(
                "remote.base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        };
        Ok(format!("{ws_base}{}", self.ws_path))
    }
}

/// Snapshot synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Fixed poll interval in seconds (safety net when push is unavailable)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Initial reconnect backoff in seconds
    #[serde(default = "default_reconnect_min_secs")]
    pub reconnect_min_secs: u64,

    /// Reconnect backoff ceiling in seconds
    #[serde(default = "default_reconnect_max_secs")]
    pub reconnect_max_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_reconnect_min_secs() -> u64 {
    1
}

fn default_reconnect_max_secs() -> u64 {
    30
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            reconnect_min_secs: default_reconnect_min_secs(),
            reconnect_max_secs: default_reconnect_max_secs(),
        }
    }
}

/// Briefing archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingsConfig {
    /// Page size for the briefing history view
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    5
}

impl Default for BriefingsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load configuration from a `.vcc.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(".vcc.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.sync.poll_interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "sync.poll_interval_secs must be >= 1".to_string(),
            ));
        }
        if self.sync.reconnect_min_secs == 0 {
            return Err(Error::InvalidConfig(
                "sync.reconnect_min_secs must be >= 1".to_string(),
            ));
        }
        if self.sync.reconnect_max_secs < self.sync.reconnect_min_secs {
            return Err(Error::InvalidConfig(
                "sync.reconnect_max_secs must be >= sync.reconnect_min_secs".to_string(),
            ));
        }
        if self.briefings.page_size == 0 {
            return Err(Error::InvalidConfig(
                "briefings.page_size must be >= 1".to_string(),
            ));
        }
        self.remote.ws_url()?;
        Ok(())
    }
}

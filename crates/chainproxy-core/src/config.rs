//! Gateway configuration, loaded from TOML.
//!
//! ```toml
//! [general_settings]
//! server_port = 8079
//! cfg_file_read_interval = 60
//!
//! [rest_client]
//! request_timeout_ms = 10000
//! max_retries = 0
//!
//! [log]
//! level = "info"
//! json = false
//!
//! [[observers]]
//! shard_id = 0
//! address = "http://127.0.0.1:8080"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::retry::RetryConfig;
use crate::types::Observer;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    #[serde(alias = "GeneralSettings")]
    pub general_settings: GeneralSettings,
    pub rest_client: RestClientConfig,
    pub log: LogConfig,
    /// Observers in failover order.
    #[serde(alias = "Observers")]
    pub observers: Vec<Observer>,
}

impl ProxyConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    #[serde(alias = "ServerPort")]
    pub server_port: u16,
    /// Seconds between config re-reads. Carried for compatibility; the
    /// observer list is loaded once.
    #[serde(alias = "CfgFileReadInterval")]
    pub cfg_file_read_interval: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            server_port: 8079,
            cfg_file_read_interval: 60,
        }
    }
}

/// Per-call settings of the observer REST client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestClientConfig {
    pub request_timeout_ms: u64,
    /// Retries against the same observer before the dispatcher moves on.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            max_retries: 0,
            initial_backoff_ms: 100,
        }
    }
}

impl RestClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            ..RetryConfig::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Global filter: "trace" | "debug" | "info" | "warn" | "error", or a
    /// full `EnvFilter` directive string.
    pub level: String,
    /// Emit JSON structured logs (true) or human-readable text (false)
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

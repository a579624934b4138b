//! # Configuration Management for redis-handle
//!
//! Centralized configuration for the cache handle: where Redis lives, how long to wait
//! on it, and how hard to try reconnecting.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{CacheConfig, ReconnectPolicy};
//!
//! let cache_config = CacheConfig::new("redis://localhost:6379".to_string())
//!     .with_timeouts(2000, 1000)
//!     .with_reconnect(ReconnectPolicy::new(5, 100, 3000));
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [cache]
//! redis_url = "redis://localhost:6379"
//! connection_timeout_ms = 2000
//! response_timeout_ms = 1000
//!
//! [cache.reconnect]
//! max_retries = 5
//! base_delay_ms = 100
//! max_delay_ms = 3000
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // .env REDIS_HANDLE_CONFIG, then ./redis-handle.toml, then defaults
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path, time::Duration};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./redis-handle.toml";
const CONFIG_PATH_VAR: &str = "REDIS_HANDLE_CONFIG";
const REDIS_URL_VAR: &str = "REDIS_URL";

/// Address the redis client falls back to when nothing is configured
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheConfig,
}

/// Cache connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub redis_url: String,
    pub connection_timeout_ms: u64,
    pub response_timeout_ms: u64,
    pub reconnect: ReconnectPolicy,
}

/// Bounded exponential backoff used when (re)establishing the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    /// Attempts after the first one; 0 disables retrying
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env, the default path, or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine, a malformed one is not
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let mut config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self::default()
        };

        if let Ok(url) = env::var(REDIS_URL_VAR) {
            config.cache.redis_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()
    }
}

impl CacheConfig {
    /// Create a new cache configuration with default timeouts and reconnect policy
    pub fn new(redis_url: String) -> Self {
        Self {
            redis_url,
            ..Self::default()
        }
    }

    pub fn with_timeouts(mut self, connection_timeout_ms: u64, response_timeout_ms: u64) -> Self {
        self.connection_timeout_ms = connection_timeout_ms;
        self.response_timeout_ms = response_timeout_ms;
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.redis_url.is_empty() {
            return Err(ConfigError::Invalid(
                "Redis URL cannot be empty".to_string(),
            ));
        }
        if !["redis://", "rediss://", "redis+unix://"]
            .iter()
            .any(|scheme| self.redis_url.starts_with(scheme))
        {
            return Err(ConfigError::Invalid(format!(
                "Redis URL has an unsupported scheme: {}",
                self.redis_url
            )));
        }
        if self.connection_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Cache connection_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.response_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Cache response_timeout_ms must be greater than 0".to_string(),
            ));
        }
        self.reconnect.validate()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            connection_timeout_ms: 3000,
            response_timeout_ms: 2000,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ReconnectPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// Single attempt, never retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay to wait before retry number `attempt` (0-based), capped at `max_delay_ms`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "Reconnect base_delay_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(ConfigError::Invalid(
                "Reconnect max_delay_ms cannot be less than base_delay_ms".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

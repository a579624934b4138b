//! Process bootstrap
//!
//! Builds the single cache handle the process shares. Consumers receive it by
//! reference or clone from here instead of reaching for a global.

use cache_system::{CacheBackend, CacheHandle};
use config::{AppConfig, CacheConfig};
use tracing::{info, warn};

use crate::errors::AppError;

/// Owns the process-wide cache handle
#[derive(Debug, Clone)]
pub struct RedisHandle {
    cache: CacheHandle,
    config: CacheConfig,
}

impl RedisHandle {
    /// Connect using configuration from the environment (see `AppConfig::load`)
    pub async fn from_env() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        Self::init(config.cache).await
    }

    /// Connect to Redis with an explicit configuration
    pub async fn init(config: CacheConfig) -> Result<Self, AppError> {
        config.validate()?;
        crate::debug_log!(url = %config.redis_url, "initializing cache handle");

        let cache = CacheHandle::connect(config.clone()).await?;
        if cache.is_alive() {
            info!(url = %config.redis_url, "Cache handle ready");
        } else {
            warn!(url = %config.redis_url, "Cache handle started without a connection");
        }

        Ok(Self { cache, config })
    }

    /// Build around an existing backend, typically a fake in tests
    pub fn with_backend<B>(backend: B, config: CacheConfig) -> Self
    where
        B: CacheBackend + 'static,
    {
        Self {
            cache: CacheHandle::new(backend),
            config,
        }
    }

    /// The shared cache handle
    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Check cache connection health
    pub async fn health_check(&self) -> Result<(), AppError> {
        if !self.cache.is_alive() {
            crate::trace_log!("health check on a handle that is not alive");
        }
        self.cache.ping().await?;
        Ok(())
    }
}

impl From<RedisHandle> for CacheHandle {
    fn from(handle: RedisHandle) -> Self {
        handle.cache
    }
}


//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::backend::CacheBackend;
pub use crate::errors::CacheError;
pub use crate::handle::{CacheHandle, Lookup};
pub use crate::memory::MemoryBackend;
pub use crate::redis_backend::RedisBackend;

// Re-export centralized config
pub use config::{CacheConfig, ReconnectPolicy};

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use tokio;

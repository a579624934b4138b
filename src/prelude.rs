//! Convenience re-exports for common redis-handle usage
//!
//! # Example
//!
//! ```rust
//! use redis_handle::prelude::*;
//!
//! let cache = CacheHandle::new(MemoryBackend::new());
//! assert!(cache.is_alive());
//! ```

// Core components
pub use crate::core::RedisHandle;
pub use crate::errors::AppError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, ConfigError, ReconnectPolicy};

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use tokio;

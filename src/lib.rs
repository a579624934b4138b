//! # redis-handle
//!
//! A small, failure-tolerant facade over a remote Redis cache: liveness, get,
//! set-with-expiration and delete, with an explicit reconnect policy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redis_handle::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CacheConfig::new("redis://localhost:6379".to_string())
//!         .with_reconnect(ReconnectPolicy::new(5, 100, 2000));
//!
//!     // Build once at startup, then hand `cache` to whoever needs it
//!     let handle = RedisHandle::init(config).await?;
//!     let cache = handle.cache().clone();
//!
//!     cache.set("session:42", "userA", 60).await;
//!     match cache.lookup("session:42").await {
//!         Lookup::Found(user) => println!("Session owner: {}", user),
//!         Lookup::NotFound => println!("Session expired"),
//!         Lookup::Unavailable(e) => println!("Cache down: {}", e),
//!         Lookup::Rejected(e) => println!("Bad key: {}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::RedisHandle;
pub use errors::AppError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, ConfigError, ReconnectPolicy};

// Re-export internal crates used by the public API
pub use cache_system;
pub use cache_system::{CacheBackend, CacheError, CacheHandle, Lookup, MemoryBackend};

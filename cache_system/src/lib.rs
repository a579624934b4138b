//! Cache system for Redis-based caching
//!
//! This crate provides the `CacheHandle` facade over a remote Redis cache,
//! the `CacheBackend` seam behind it, and an in-memory backend for tests.

/// Per-operation traces, compiled in only with the `debug-logging` feature
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;

pub mod backend;
pub mod errors;
pub mod handle;
pub mod memory;
pub mod prelude;
pub mod redis_backend;

// Re-export centralized config
pub use config::{CacheConfig, ReconnectPolicy};

pub use backend::CacheBackend;
pub use errors::CacheError;
pub use handle::{CacheHandle, Lookup};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;

//! Error types for cache operations
//!
//! This module defines all error types that can occur
//! during cache operations and Redis interactions.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache operation timeout")]
    Timeout,

    #[error("Invalid TTL value: {0}")]
    InvalidTtl(u64),

    #[error("Cache key cannot be empty")]
    InvalidKey,

    #[error("Cache value cannot be empty")]
    InvalidValue,
}

impl CacheError {
    /// Whether the error means the connection itself is gone, not just one command
    pub fn is_connection_loss(&self) -> bool {
        match self {
            CacheError::Connection(err) => {
                err.is_io_error()
                    || err.is_connection_dropped()
                    || err.is_connection_refusal()
                    || err.is_timeout()
            }
            CacheError::Unavailable(_) | CacheError::Timeout => true,
            CacheError::InvalidTtl(_) | CacheError::InvalidKey | CacheError::InvalidValue => {
                false
            }
        }
    }
}

//! Storage backend abstraction
//!
//! `CacheHandle` talks to the cache through this trait so the Redis transport
//! can be swapped for an in-process fake.

use crate::errors::CacheError;
use async_trait::async_trait;
use std::fmt::Debug;

#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Whether the backend currently holds a usable connection
    fn is_ready(&self) -> bool;

    /// Round-trip check against the server
    async fn ping(&self) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `seconds`
    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<(), CacheError>;

    /// Remove `key`; `Ok(false)` when it was not present
    async fn del(&self, key: &str) -> Result<bool, CacheError>;
}

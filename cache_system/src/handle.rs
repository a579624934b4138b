//! Cache handle implementation
//!
//! `CacheHandle` is the facade the rest of the application uses. It comes
//! with two families of operations:
//!
//! - `get` / `set` / `del` are best effort. Failures are logged and swallowed,
//!   so an unavailable cache never takes the caller down with it.
//! - `lookup` / `try_set` / `try_del` report what happened, so the caller can
//!   pick its own degradation policy.

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use crate::redis_backend::RedisBackend;
use config::CacheConfig;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::error;

/// Outcome of a cache read
#[derive(Debug)]
pub enum Lookup {
    Found(String),
    NotFound,
    /// The read could not be served; carries the reason
    Unavailable(CacheError),
    /// The key was refused before reaching the cache
    Rejected(CacheError),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Lookup::Unavailable(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Lookup::Rejected(_))
    }

    /// Collapse to the value, treating a failure like a miss
    pub fn into_option(self) -> Option<String> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Unavailable(_) | Lookup::Rejected(_) => None,
        }
    }
}

/// Shared handle to the remote cache
#[derive(Clone)]
pub struct CacheHandle {
    backend: Arc<dyn CacheBackend>,
}

impl Debug for CacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHandle")
            .field("backend", &self.backend)
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl CacheHandle {
    /// Wrap an existing backend
    pub fn new<B>(backend: B) -> Self
    where
        B: CacheBackend + 'static,
    {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_backend(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Connect to Redis
    ///
    /// Fails only when the URL itself is unusable. If the server cannot be
    /// reached within the reconnect policy the error is logged and the handle
    /// comes back not alive; later operations will try to reconnect.
    pub async fn connect(config: CacheConfig) -> Result<Self, CacheError> {
        let backend = RedisBackend::new(config)?;

        if let Err(err) = backend.connect().await {
            error!("Redis Client Error: {}", err);
        }

        Ok(Self::new(backend))
    }

    /// Whether the connection is currently established
    ///
    /// With Redis this flips to false only once a command fails on a lost
    /// connection; a server that dies while the handle is idle still reads as
    /// alive until the next operation. Use `ping` for an active check.
    pub fn is_alive(&self) -> bool {
        self.backend.is_ready()
    }

    /// Round-trip to the server
    pub async fn ping(&self) -> Result<(), CacheError> {
        self.backend.ping().await
    }

    /// Value stored under `key`, or `None` if it is absent or the read failed
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key).await {
            Lookup::Unavailable(err) | Lookup::Rejected(err) => {
                error!(key, "Error getting key from Redis: {}", err);
                None
            }
            lookup => lookup.into_option(),
        }
    }

    /// Store `value` under `key` for `duration_secs` seconds; failures are only logged
    pub async fn set(&self, key: &str, value: &str, duration_secs: u64) {
        if let Err(err) = self.try_set(key, value, duration_secs).await {
            error!(key, "Error setting key in Redis: {}", err);
        }
    }

    /// Remove `key`; a missing key is not an error, failures are only logged
    pub async fn del(&self, key: &str) {
        if let Err(err) = self.try_del(key).await {
            error!(key, "Error deleting key from Redis: {}", err);
        }
    }

    pub async fn lookup(&self, key: &str) -> Lookup {
        if key.is_empty() {
            return Lookup::Rejected(CacheError::InvalidKey);
        }

        crate::debug_log!(key, "cache lookup");
        match self.backend.get(key).await {
            Ok(Some(value)) => Lookup::Found(value),
            Ok(None) => Lookup::NotFound,
            Err(err) => Lookup::Unavailable(err),
        }
    }

    pub async fn try_set(
        &self,
        key: &str,
        value: &str,
        duration_secs: u64,
    ) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }
        if value.is_empty() {
            return Err(CacheError::InvalidValue);
        }
        if duration_secs == 0 {
            return Err(CacheError::InvalidTtl(duration_secs));
        }

        crate::debug_log!(key, ttl = duration_secs, "cache set");
        self.backend.set_ex(key, value, duration_secs).await
    }

    /// Returns whether a key was actually removed
    pub async fn try_del(&self, key: &str) -> Result<bool, CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        crate::debug_log!(key, "cache delete");
        self.backend.del(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unwritten_key_misses() {
        let cache = CacheHandle::new(MemoryBackend::new());

        assert_eq!(cache.get("never-written").await, None);
        assert!(matches!(cache.lookup("never-written").await, Lookup::NotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_duration() {
        let cache = CacheHandle::new(MemoryBackend::new());

        cache.set("session:42", "userA", 60).await;
        assert_eq!(cache.get("session:42").await, Some("userA".to_string()));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get("session:42").await, None);
    }

    #[tokio::test]
    async fn test_validation_rejects_bad_input() {
        let cache = CacheHandle::new(MemoryBackend::new());

        assert!(matches!(
            cache.try_set("", "v", 10).await,
            Err(CacheError::InvalidKey)
        ));
        assert!(matches!(
            cache.try_set("k", "", 10).await,
            Err(CacheError::InvalidValue)
        ));
        assert!(matches!(
            cache.try_set("k", "v", 0).await,
            Err(CacheError::InvalidTtl(0))
        ));
        assert!(matches!(cache.try_del("").await, Err(CacheError::InvalidKey)));
        let empty = cache.lookup("").await;
        assert!(empty.is_rejected());
        assert!(!empty.is_unavailable());
        assert!(matches!(empty, Lookup::Rejected(CacheError::InvalidKey)));
        assert_eq!(cache.get("").await, None);

        // The best-effort forms swallow the same errors
        cache.set("k", "v", 0).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_lookup_tells_failure_from_miss() {
        let backend = Arc::new(MemoryBackend::new());
        let cache = CacheHandle::from_backend(backend.clone());

        cache.set("k", "v", 30).await;
        assert!(cache.lookup("k").await.is_found());

        backend.set_ready(false);
        assert!(cache.lookup("k").await.is_unavailable());
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_clones_share_backend() {
        let cache = CacheHandle::new(MemoryBackend::new());
        let other = cache.clone();

        cache.set("shared", "yes", 30).await;
        assert_eq!(other.get("shared").await, Some("yes".to_string()));
    }
}

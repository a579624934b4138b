//! In-process cache backend
//!
//! Behaves like the Redis backend (string values, per-key expiry, idempotent
//! delete) without a server. Expiry follows the tokio clock, so tests can
//! pause and advance time.

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
    ready: AtomicBool,
}

impl MemoryBackend {
    /// A connected, empty backend
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ready: AtomicBool::new(true),
        }
    }

    /// A backend that refuses every operation until `set_ready(true)`
    pub fn disconnected() -> Self {
        let backend = Self::new();
        backend.set_ready(false);
        backend
    }

    /// Simulate the connection coming up or going away
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Number of entries that have not expired yet
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_ready(&self) -> Result<(), CacheError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(CacheError::Unavailable(
                "in-memory backend is disconnected".to_string(),
            ))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check_ready()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_ready()?;

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<(), CacheError> {
        self.check_ready()?;

        // A TTL past the end of the clock cannot be represented
        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(seconds))
            .ok_or(CacheError::InvalidTtl(seconds))?;
        let entry = Entry {
            value: value.to_string(),
            expires_at,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, CacheError> {
        self.check_ready()?;

        let now = Instant::now();
        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|entry| entry.is_live(now)))
    }
}

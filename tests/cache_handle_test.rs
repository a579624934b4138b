//! Integration tests for the cache handle contract
//!
//! Run against the in-memory backend on a paused tokio clock, so expiry
//! can be checked without waiting and without a Redis server.

use redis_handle::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn memory_handle() -> (Arc<MemoryBackend>, CacheHandle) {
    let backend = Arc::new(MemoryBackend::new());
    let cache = CacheHandle::from_backend(backend.clone());
    (backend, cache)
}

#[tokio::test]
async fn test_never_written_keys_miss() {
    let (_, cache) = memory_handle();

    for key in ["a", "user:1", "session:42", "ключ"] {
        assert_eq!(cache.get(key).await, None, "Should miss on {}", key);
    }
}

#[tokio::test(start_paused = true)]
async fn test_value_visible_until_expiry() {
    let (_, cache) = memory_handle();
    let cases = [("short", "1", 1u64), ("minute", "2", 60), ("hour", "3", 3600)];

    for (key, value, ttl) in cases {
        cache.set(key, value, ttl).await;
    }

    tokio::time::advance(Duration::from_millis(999)).await;
    for (key, value, _) in cases {
        assert_eq!(cache.get(key).await.as_deref(), Some(value));
    }

    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(cache.get("short").await, None);
    assert_eq!(cache.get("minute").await, None);
    assert_eq!(cache.get("hour").await, Some("3".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_session_scenario() {
    let (_, cache) = memory_handle();

    cache.set("session:42", "userA", 60).await;
    assert_eq!(cache.get("session:42").await, Some("userA".to_string()));

    tokio::time::advance(Duration::from_secs(61)).await;
    assert_eq!(cache.get("session:42").await, None);
}

#[tokio::test]
async fn test_del_then_get_misses() {
    let (backend, cache) = memory_handle();

    cache.set("present", "v", 60).await;
    cache.del("present").await;
    assert_eq!(cache.get("present").await, None);

    cache.del("absent").await;
    assert_eq!(cache.get("absent").await, None);
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_del_nonexistent_key_is_noop() {
    let (backend, cache) = memory_handle();
    cache.set("other", "keep", 60).await;

    cache.del("nonexistent-key").await;
    assert!(matches!(cache.try_del("nonexistent-key").await, Ok(false)));

    assert_eq!(backend.len().await, 1);
    assert_eq!(cache.get("other").await, Some("keep".to_string()));
}

#[tokio::test]
async fn test_huge_ttl_does_not_crash_caller() {
    let (_, cache) = memory_handle();

    cache.set("k", "v", u64::MAX).await;
    assert_eq!(cache.get("k").await, None);
    assert!(matches!(
        cache.try_set("k", "v", u64::MAX).await,
        Err(CacheError::InvalidTtl(u64::MAX))
    ));
}

#[tokio::test]
async fn test_liveness_follows_connection() {
    let backend = Arc::new(MemoryBackend::disconnected());
    let cache = CacheHandle::from_backend(backend.clone());
    assert!(!cache.is_alive());

    backend.set_ready(true);
    assert!(cache.is_alive());
}

#[tokio::test]
async fn test_not_ready_handle_degrades_quietly() {
    let backend = Arc::new(MemoryBackend::disconnected());
    let cache = CacheHandle::from_backend(backend.clone());

    cache.set("k", "v", 60).await;
    cache.del("k").await;
    assert_eq!(cache.get("k").await, None);

    assert!(cache.lookup("k").await.is_unavailable());
    assert!(matches!(
        cache.try_set("k", "v", 60).await,
        Err(CacheError::Unavailable(_))
    ));

    // Writes attempted while down did not land
    backend.set_ready(true);
    assert!(matches!(cache.lookup("k").await, Lookup::NotFound));
}

#[tokio::test]
async fn test_bootstrap_with_injected_backend() {
    let handle = RedisHandle::with_backend(MemoryBackend::new(), CacheConfig::default());
    assert!(handle.health_check().await.is_ok());

    let cache: CacheHandle = handle.clone().into();
    cache.set("from-clone", "v", 10).await;
    assert_eq!(
        handle.cache().get("from-clone").await,
        Some("v".to_string())
    );
}

#[tokio::test]
async fn test_bootstrap_rejects_invalid_config() {
    let config = CacheConfig::new("memcached://localhost:11211".to_string());
    assert!(matches!(
        RedisHandle::init(config).await,
        Err(AppError::Config(_))
    ));
}

#[tokio::test]
async fn test_bootstrap_survives_unreachable_server() {
    let config = CacheConfig::new("redis://127.0.0.1:1".to_string())
        .with_timeouts(500, 500)
        .with_reconnect(ReconnectPolicy::new(1, 1, 1));

    let handle = RedisHandle::init(config).await.unwrap();
    assert!(!handle.cache().is_alive());
    assert!(handle.health_check().await.is_err());
    assert_eq!(handle.cache().get("k").await, None);
}

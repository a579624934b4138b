//! # Basic Usage
//!
//! This demo walks through the cache handle:
//! - Loading configuration (.env / redis-handle.toml / defaults)
//! - Connecting once at startup and sharing the handle
//! - Best-effort get / set / del
//! - Explicit lookups that tell a miss from an outage
//!
//! Start Redis first: docker run -d --name redis -p 6379:6379 redis:7-alpine

use redis_handle::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

async fn remember_session(cache: &CacheHandle, session_id: &str, user: &str) {
    cache.set(&format!("session:{}", session_id), user, 60).await;
}

async fn session_owner(cache: &CacheHandle, session_id: &str) -> Option<String> {
    cache.get(&format!("session:{}", session_id)).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("redis-handle basic usage");
    println!("========================");

    let handle = RedisHandle::from_env().await?;
    let cache = handle.cache().clone();

    if !cache.is_alive() {
        println!("Redis is not reachable at {}", handle.config().redis_url);
        println!("Operations below will log errors and fall back to misses.");
    }

    remember_session(&cache, "42", "userA").await;
    println!("session:42 -> {:?}", session_owner(&cache, "42").await);

    match cache.lookup("session:missing").await {
        Lookup::Found(user) => println!("unexpected owner {}", user),
        Lookup::NotFound => println!("session:missing -> not found"),
        Lookup::Unavailable(e) => println!("session:missing -> cache unavailable: {}", e),
        Lookup::Rejected(e) => println!("session:missing -> rejected: {}", e),
    }

    cache.del("session:42").await;
    println!("after del, session:42 -> {:?}", session_owner(&cache, "42").await);

    cache.set("flash", "gone soon", 1).await;
    tokio::time::sleep(Duration::from_millis(1200)).await;
    println!("after expiry, flash -> {:?}", cache.get("flash").await);

    match handle.health_check().await {
        Ok(()) => println!("Redis connection healthy"),
        Err(e) => println!("Redis health check failed: {}", e),
    }

    Ok(())
}

//! Redis-backed cache storage
//!
//! Owns a single multiplexed connection, created lazily and replaced
//! when the server goes away.

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use async_trait::async_trait;
use config::CacheConfig;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisResult};
use std::fmt::Debug;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

/// A connection tagged with the connect attempt that produced it
#[derive(Debug, Clone)]
struct Tagged<C> {
    generation: u64,
    conn: C,
}

/// Empty the slot only if it still holds the connection from `generation`
fn take_if_generation<C>(slot: &mut Option<Tagged<C>>, generation: u64) -> Option<C> {
    if slot.as_ref().is_some_and(|t| t.generation == generation) {
        slot.take().map(|t| t.conn)
    } else {
        None
    }
}

/// Redis cache backend
pub struct RedisBackend {
    client: Client,
    config: CacheConfig,
    connection: RwLock<Option<Tagged<MultiplexedConnection>>>,
    generation: AtomicU64,
    ready: AtomicBool,
}

impl Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection.try_read() {
            Ok(conn) => {
                if conn.is_some() {
                    "connected"
                } else {
                    "no_connection"
                }
            }
            Err(_) => "lock_busy",
        };

        f.debug_struct("RedisBackend")
            .field("config", &self.config)
            .field("connected", &connection_status)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl RedisBackend {
    /// Create a backend without touching the network
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.redis_url.as_str())?;

        Ok(Self {
            client,
            config,
            connection: RwLock::new(None),
            generation: AtomicU64::new(0),
            ready: AtomicBool::new(false),
        })
    }

    /// Establish the connection, retrying under the configured reconnect policy
    pub async fn connect(&self) -> Result<(), CacheError> {
        let policy = self.config.reconnect;
        let mut attempt = 0;

        loop {
            match self.open().await {
                Ok(conn) => {
                    *self.connection.write().await = Some(self.tag(conn));
                    self.ready.store(true, Ordering::Release);
                    info!(url = %self.config.redis_url, "Connected to Redis");
                    return Ok(());
                }
                Err(err) if attempt < policy.max_retries => {
                    let delay = policy.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Redis connection attempt failed: {}",
                        err
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn tag(&self, conn: MultiplexedConnection) -> Tagged<MultiplexedConnection> {
        Tagged {
            generation: self.generation.fetch_add(1, Ordering::AcqRel) + 1,
            conn,
        }
    }

    async fn open(&self) -> Result<MultiplexedConnection, CacheError> {
        match timeout(
            self.config.connection_timeout(),
            self.client.get_multiplexed_async_connection(),
        )
        .await
        {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout),
        }
    }

    /// Get the live connection, making one reconnect attempt if it was lost
    async fn get_connection(&self) -> Result<Tagged<MultiplexedConnection>, CacheError> {
        if let Some(tagged) = self.connection.read().await.as_ref() {
            return Ok(tagged.clone());
        }

        let mut slot = self.connection.write().await;
        // Another task may have reconnected while we waited for the lock
        if let Some(tagged) = slot.as_ref() {
            return Ok(tagged.clone());
        }

        let tagged = self.tag(self.open().await?);
        *slot = Some(tagged.clone());
        self.ready.store(true, Ordering::Release);
        info!(url = %self.config.redis_url, "Reconnected to Redis");
        Ok(tagged)
    }

    /// Discard the connection from `generation`; a newer one is left alone
    async fn drop_connection(&self, generation: u64, err: &CacheError) {
        let mut slot = self.connection.write().await;
        if take_if_generation(&mut slot, generation).is_some() {
            self.ready.store(false, Ordering::Release);
            error!("Redis Client Error: {}", err);
        }
    }

    /// Run one command on the shared connection, bounded by the response timeout
    async fn run<T, F, Fut>(&self, command: F) -> Result<T, CacheError>
    where
        F: FnOnce(MultiplexedConnection) -> Fut + Send,
        Fut: Future<Output = RedisResult<T>> + Send,
    {
        let Tagged { generation, conn } = self.get_connection().await?;

        let result = match timeout(self.config.response_timeout(), command(conn)).await {
            Ok(result) => result.map_err(CacheError::from),
            Err(_) => Err(CacheError::Timeout),
        };

        if let Err(err) = &result {
            if err.is_connection_loss() {
                self.drop_connection(generation, err).await;
            }
        }
        result
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    // Cleared only when a command fails on a lost connection, not when an
    // idle connection goes away
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let _: String = self
            .run(|mut conn| async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.run(|mut conn| async move { conn.get(key).await })
            .await
    }

    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<(), CacheError> {
        self.run(|mut conn| async move { conn.set_ex(key, value, seconds).await })
            .await
    }

    async fn del(&self, key: &str) -> Result<bool, CacheError> {
        let deleted: i64 = self
            .run(|mut conn| async move { conn.del(key).await })
            .await?;
        Ok(deleted > 0)
    }
}

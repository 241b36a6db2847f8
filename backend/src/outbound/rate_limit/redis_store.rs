//! Redis-backed `RateLimitStore` using a `bb8-redis` pool.
//!
//! Windows open with `SET key 1 NX EX <window>`. `INCR` on a key that
//! expired between the read and the write recreates it without a TTL, so an
//! increment that returns 1 re-applies the expiry.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, RedisError};
use bb8_redis::RedisConnectionManager;
use tracing::debug;

use crate::domain::RateLimitKey;
use crate::domain::ports::{RateLimitStore, RateLimitStoreError};

/// Connection pool type shared with the server bootstrap.
pub type RedisPool = Pool<RedisConnectionManager>;

/// Connection URL for a Redis host and port.
///
/// # Examples
/// ```
/// use speedtest::outbound::rate_limit::redis_url;
///
/// assert_eq!(redis_url("redis", 6379), "redis://redis:6379/");
/// ```
pub fn redis_url(host: &str, port: u16) -> String {
    format!("redis://{host}:{port}/")
}

/// Rate-limit counters stored as expiring Redis integers.
#[derive(Clone)]
pub struct RedisRateLimitStore {
    pool: RedisPool,
}

impl RedisRateLimitStore {
    /// Wrap an existing pool.
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Build a lazily connecting pool for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitStoreError::Connection`] when the URL is invalid.
    pub fn connect_lazy(url: &str, max_size: u32) -> Result<Self, RateLimitStoreError> {
        let manager = RedisConnectionManager::new(url).map_err(map_connection_error)?;
        let pool = Pool::builder().max_size(max_size).build_unchecked(manager);
        Ok(Self::new(pool))
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, RateLimitStoreError> {
        self.pool.get().await.map_err(map_run_error)
    }
}

fn window_seconds(window: Duration) -> u64 {
    window.as_secs().max(1)
}

fn map_connection_error(error: RedisError) -> RateLimitStoreError {
    RateLimitStoreError::connection(error.to_string())
}

fn map_command_error(error: RedisError) -> RateLimitStoreError {
    RateLimitStoreError::command(error.to_string())
}

fn map_run_error(error: RunError<RedisError>) -> RateLimitStoreError {
    match error {
        RunError::User(error) => map_connection_error(error),
        RunError::TimedOut => RateLimitStoreError::connection("timed out waiting for connection"),
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn current(&self, key: &RateLimitKey) -> Result<Option<u64>, RateLimitStoreError> {
        let mut conn = self.connection().await?;
        let count: Option<u64> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_command_error)?;
        Ok(count)
    }

    async fn open_window(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<u64, RateLimitStoreError> {
        let opened = {
            let mut conn = self.connection().await?;
            let reply: Option<String> = redis::cmd("SET")
                .arg(key.as_str())
                .arg(1)
                .arg("NX")
                .arg("EX")
                .arg(window_seconds(window))
                .query_async(&mut *conn)
                .await
                .map_err(map_command_error)?;
            reply.is_some()
        };

        if opened {
            return Ok(1);
        }
        debug!(key = %key, "window opened concurrently; incrementing instead");
        self.increment(key, window).await
    }

    async fn increment(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<u64, RateLimitStoreError> {
        let mut conn = self.connection().await?;
        let count: u64 = redis::cmd("INCR")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_command_error)?;

        if count == 1 {
            let _: bool = redis::cmd("EXPIRE")
                .arg(key.as_str())
                .arg(window_seconds(window))
                .query_async(&mut *conn)
                .await
                .map_err(map_command_error)?;
        }
        Ok(count)
    }
}

//! Fixed-window request limiting per client address.
//!
//! Each client gets a counter keyed `rate_limit:<client>`. The first request
//! opens a window with the counter at 1; later requests increment it until
//! it reaches the cap, after which requests are rejected without touching
//! the counter. The window ends only when the counter expires in the store.
//!
//! Admission is decided on the value returned by the atomic increment, so
//! concurrent requests that all read a counter below the cap cannot push the
//! number of admitted requests past it.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::Error;
use super::ports::{RateLimitStore, RateLimitStoreError, RateLimiter};

/// Prefix of every counter key.
pub const RATE_LIMIT_KEY_PREFIX: &str = "rate_limit:";

/// Cap and window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_requests: u64,
    window: Duration,
}

impl RateLimitPolicy {
    pub const DEFAULT_MAX_REQUESTS: u64 = 10;
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_REQUESTS, Self::DEFAULT_WINDOW)
    }
}

/// Store key identifying one client's counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    /// Key for `client`, usually the peer IP address.
    ///
    /// # Examples
    /// ```
    /// use speedtest::domain::RateLimitKey;
    ///
    /// assert_eq!(RateLimitKey::for_client("10.0.0.7").as_str(), "rate_limit:10.0.0.7");
    /// ```
    pub fn for_client(client: &str) -> Self {
        Self(format!("{RATE_LIMIT_KEY_PREFIX}{client}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Admitted; `count` is the counter after this request.
    Allowed { count: u64 },
    /// Rejected; `count` is the unchanged counter.
    Rejected { count: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Limiter backed by an expiring counter store.
#[derive(Clone)]
pub struct RateLimiterService<S> {
    store: S,
    policy: RateLimitPolicy,
}

impl<S> RateLimiterService<S> {
    pub fn new(store: S, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }
}

fn map_store_error(error: RateLimitStoreError) -> Error {
    warn!(error = %error, "rate limit store failed");
    Error::service_unavailable("rate limiting is temporarily unavailable")
}

#[async_trait]
impl<S> RateLimiter for RateLimiterService<S>
where
    S: RateLimitStore,
{
    async fn check(&self, client: &str) -> Result<RateLimitDecision, Error> {
        let key = RateLimitKey::for_client(client);
        let count = match self.store.current(&key).await.map_err(map_store_error)? {
            None => self
                .store
                .open_window(&key, self.policy.window())
                .await
                .map_err(map_store_error)?,
            Some(count) if count >= self.policy.max_requests() => {
                let decision = RateLimitDecision::Rejected { count };
                debug!(key = %key, ?decision, "rate limit checked");
                return Ok(decision);
            }
            Some(_) => self
                .store
                .increment(&key, self.policy.window())
                .await
                .map_err(map_store_error)?,
        };
        // Lost a race for the last slot(s) in the window.
        let decision = if count > self.policy.max_requests() {
            RateLimitDecision::Rejected { count }
        } else {
            RateLimitDecision::Allowed { count }
        };
        debug!(key = %key, ?decision, "rate limit checked");
        Ok(decision)
    }
}

//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use speedtest::domain::RateLimitPolicy;
use speedtest::domain::ports::WeatherSource;
use speedtest::outbound::persistence::DbPool;
use speedtest::outbound::rate_limit::RedisRateLimitStore;

/// Adapters and settings needed to assemble the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) rate_limit_store: RedisRateLimitStore,
    pub(crate) rate_limit_policy: RateLimitPolicy,
    pub(crate) weather: Arc<dyn WeatherSource>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Construct a configuration with the default rate-limit policy and the
    /// system clock.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        rate_limit_store: RedisRateLimitStore,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            rate_limit_store,
            rate_limit_policy: RateLimitPolicy::default(),
            weather,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Override the per-client request cap.
    #[must_use]
    pub fn with_rate_limit_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit_policy = policy;
        self
    }
}

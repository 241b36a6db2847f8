//! Driving port consulted by the request-limiting middleware.

use async_trait::async_trait;

use crate::domain::{Error, RateLimitDecision};

/// Decides whether a client may proceed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record an attempt by `client` and report whether it is admitted.
    async fn check(&self, client: &str) -> Result<RateLimitDecision, Error>;
}

/// Fixture limiter that admits everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRateLimiter;

#[async_trait]
impl RateLimiter for FixtureRateLimiter {
    async fn check(&self, _client: &str) -> Result<RateLimitDecision, Error> {
        Ok(RateLimitDecision::Allowed { count: 1 })
    }
}

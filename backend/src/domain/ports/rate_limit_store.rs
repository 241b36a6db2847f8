//! Port for the counter store backing the request limiter.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::RateLimitKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by counter store adapters.
    pub enum RateLimitStoreError {
        /// The store could not be reached.
        Connection { message: String } => "rate limit store connection failed: {message}",
        /// A store command failed or returned an unexpected value.
        Command { message: String } => "rate limit store command failed: {message}",
    }
}

/// Expiring integer counters keyed by client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Current count, or `None` when the window has not started or has expired.
    async fn current(&self, key: &RateLimitKey) -> Result<Option<u64>, RateLimitStoreError>;

    /// Start a window at 1 expiring after `window`, returning the count.
    ///
    /// If a concurrent request opened the window first, the existing counter is
    /// incremented instead.
    async fn open_window(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<u64, RateLimitStoreError>;

    /// Increment the counter, returning the new count.
    ///
    /// A counter that expired since it was read is recreated with `window`.
    async fn increment(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<u64, RateLimitStoreError>;
}

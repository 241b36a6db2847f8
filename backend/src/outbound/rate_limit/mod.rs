//! Counter store adapters for the request limiter.

mod redis_store;

pub use redis_store::{RedisPool, RedisRateLimitStore, redis_url};

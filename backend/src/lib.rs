//! Speed-test ingestion service library.
//!
//! Users register to receive an API key, upload speed-test measurements that
//! are enriched with the current weather at their postal code, and query the
//! stored measurements by provider and postal code. Every request passes a
//! per-client rate limiter backed by Redis.
//!
//! Layout follows a hexagonal split: [`domain`] holds the business rules and
//! ports, [`inbound`] the HTTP adapter, [`outbound`] the Diesel, Redis and
//! weather adapters, and [`middleware`] the request tracing and limiting.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{RateLimit, Trace};

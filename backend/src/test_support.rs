//! In-memory adapters and clocks for tests.
//!
//! Compiled for unit tests and, behind the `test-support` feature, for the
//! integration tests in `tests/`.

mod clock;
mod memory;
mod weather;

pub use clock::MutableClock;
pub use memory::{InMemoryRateLimitStore, InMemorySpeedTestRepository, InMemoryUserRepository};
pub use weather::StubWeatherSource;

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`WeatherSource`], [`RateLimitStore`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`RateLimiter`]) are what inbound adapters call; the domain services
//! implement them.

mod macros;
pub(crate) use macros::define_port_error;

mod rate_limit_store;
mod rate_limiter;
mod speed_test_command;
mod speed_test_query;
mod speed_test_repository;
mod user_lookup_query;
mod user_registration_command;
mod user_repository;
mod weather_source;

#[cfg(test)]
pub use rate_limit_store::MockRateLimitStore;
pub use rate_limit_store::{RateLimitStore, RateLimitStoreError};
#[cfg(test)]
pub use rate_limiter::MockRateLimiter;
pub use rate_limiter::{FixtureRateLimiter, RateLimiter};
#[cfg(test)]
pub use speed_test_command::MockSpeedTestCommand;
pub use speed_test_command::{FixtureSpeedTestCommand, SpeedTestCommand};
#[cfg(test)]
pub use speed_test_query::MockSpeedTestQuery;
pub use speed_test_query::{FixtureSpeedTestQuery, SpeedTestQuery};
#[cfg(test)]
pub use speed_test_repository::MockSpeedTestRepository;
pub use speed_test_repository::{SpeedTestPersistenceError, SpeedTestRepository};
#[cfg(test)]
pub use user_lookup_query::MockUserLookupQuery;
pub use user_lookup_query::{FixtureUserLookupQuery, UserLookupQuery};
#[cfg(test)]
pub use user_registration_command::MockUserRegistrationCommand;
pub use user_registration_command::{FixtureUserRegistrationCommand, UserRegistrationCommand};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use weather_source::MockWeatherSource;
pub use weather_source::{
    DisabledWeatherSource, FixtureWeatherSource, WeatherSource, WeatherSourceError,
};

//! Domain primitives, services and ports.
//!
//! Purpose: hold the speed-test service's business rules independent of
//! HTTP, Diesel, Redis or the weather provider. Adapters talk to this module
//! only through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, ApiKey, Username, Zipcode: account model.
//! - SpeedTest, SpeedTestSubmission, SpeedTestFilter: measurement model.
//! - WeatherObservation: enrichment data attached at ingestion.
//! - RateLimiterService, UserAccountService, SpeedTestService: use cases.

pub mod error;
pub mod ports;
pub mod rate_limit;
pub mod speed_test;
pub mod speed_test_service;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod weather;
pub mod zipcode;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::rate_limit::{
    RATE_LIMIT_KEY_PREFIX, RateLimitDecision, RateLimitKey, RateLimitPolicy, RateLimiterService,
};
pub use self::speed_test::{
    Isp, NewSpeedTest, SpeedTest, SpeedTestFilter, SpeedTestPredicate, SpeedTestSubmission,
    SpeedTestValidationError,
};
pub use self::speed_test_service::SpeedTestService;
pub use self::trace_id::TraceId;
pub use self::user::{ApiKey, User, UserRegistration, UserValidationError, Username};
pub use self::user_service::{USER_NOT_FOUND_MESSAGE, UserAccountService};
pub use self::weather::{WeatherObservation, capitalize_condition, kelvin_to_fahrenheit};
pub use self::zipcode::{Zipcode, ZipcodeValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use speedtest::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("User not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

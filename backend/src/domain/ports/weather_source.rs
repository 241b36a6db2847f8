//! Port for the weather provider used to enrich speed tests.
//!
//! Every failure is reported through [`WeatherSourceError`]; callers treat
//! any error as "no weather available" rather than failing the request.

use async_trait::async_trait;

use crate::domain::{WeatherObservation, Zipcode};

use super::define_port_error;

define_port_error! {
    /// Reasons a weather observation could not be produced.
    pub enum WeatherSourceError {
        /// The provider answered with a non-success status.
        Unavailable { status: u16 } => "weather provider returned status {status}",
        /// The request never completed (DNS, connect, timeout).
        Transport { message: String } => "weather provider request failed: {message}",
        /// The provider answered with a payload we could not interpret.
        Decode { message: String } => "weather provider payload invalid: {message}",
        /// No provider credentials are configured.
        NotConfigured => "weather provider is not configured",
    }
}

/// Looks up current conditions for a postal code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, zipcode: &Zipcode) -> Result<WeatherObservation, WeatherSourceError>;
}

/// Source used when no provider key is configured; never produces data.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledWeatherSource;

#[async_trait]
impl WeatherSource for DisabledWeatherSource {
    async fn fetch(&self, _zipcode: &Zipcode) -> Result<WeatherObservation, WeatherSourceError> {
        Err(WeatherSourceError::not_configured())
    }
}

/// Fixture source reporting mild, clear weather everywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWeatherSource;

#[async_trait]
impl WeatherSource for FixtureWeatherSource {
    async fn fetch(&self, _zipcode: &Zipcode) -> Result<WeatherObservation, WeatherSourceError> {
        Ok(WeatherObservation::from_provider(300.0, "clear sky"))
    }
}

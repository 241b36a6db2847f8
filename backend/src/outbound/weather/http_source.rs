//! Reqwest-backed weather source adapter.
//!
//! This adapter owns transport details only: query parameters, timeout,
//! status handling and JSON decoding into a [`WeatherObservation`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::CurrentWeatherDto;
use crate::domain::ports::{WeatherSource, WeatherSourceError};
use crate::domain::{WeatherObservation, Zipcode};

/// Public OpenWeatherMap current-weather endpoint.
pub const DEFAULT_WEATHER_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Weather source performing one GET per lookup against a single endpoint.
pub struct OpenWeatherHttpSource {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl OpenWeatherHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherHttpSource {
    async fn fetch(&self, zipcode: &Zipcode) -> Result<WeatherObservation, WeatherSourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("zip", zipcode.as_ref()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), %zipcode, "weather provider rejected lookup");
            return Err(map_status_error(status));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_observation(body.as_ref())
    }
}

fn parse_observation(body: &[u8]) -> Result<WeatherObservation, WeatherSourceError> {
    let decoded: CurrentWeatherDto = serde_json::from_slice(body).map_err(|error| {
        WeatherSourceError::decode(format!("invalid weather JSON payload: {error}"))
    })?;
    decoded
        .into_observation()
        .map_err(WeatherSourceError::decode)
}

fn map_transport_error(error: reqwest::Error) -> WeatherSourceError {
    // Strip the URL: it carries the provider key as a query parameter.
    WeatherSourceError::transport(error.without_url().to_string())
}

fn map_status_error(status: StatusCode) -> WeatherSourceError {
    WeatherSourceError::unavailable(status.as_u16())
}

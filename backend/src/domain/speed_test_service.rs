//! Speed-test ingestion and query service.
//!
//! Ingestion asks the weather source for current conditions at the
//! submission's postal code. Weather is best effort: any failure is logged
//! and the record is stored with empty weather columns. Storage failures on
//! ingestion surface as `invalid_request` carrying the store's message.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    SpeedTestCommand, SpeedTestPersistenceError, SpeedTestQuery, SpeedTestRepository,
    WeatherSource,
};
use crate::domain::{
    Error, NewSpeedTest, SpeedTest, SpeedTestFilter, SpeedTestSubmission, WeatherObservation,
};

/// Service implementing [`SpeedTestCommand`] and [`SpeedTestQuery`].
#[derive(Clone)]
pub struct SpeedTestService<R: ?Sized, W: ?Sized> {
    speed_test_repo: Arc<R>,
    weather: Arc<W>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, W: ?Sized> SpeedTestService<R, W> {
    pub fn new(speed_test_repo: Arc<R>, weather: Arc<W>, clock: Arc<dyn Clock>) -> Self {
        Self {
            speed_test_repo,
            weather,
            clock,
        }
    }
}

impl<R: ?Sized, W> SpeedTestService<R, W>
where
    W: WeatherSource + ?Sized,
{
    async fn observe_weather(&self, submission: &SpeedTestSubmission) -> Option<WeatherObservation> {
        match self.weather.fetch(&submission.zipcode).await {
            Ok(observation) => Some(observation),
            Err(error) => {
                warn!(
                    zipcode = %submission.zipcode,
                    error = %error,
                    "weather enrichment unavailable; storing without weather"
                );
                None
            }
        }
    }
}

fn map_query_error(error: SpeedTestPersistenceError) -> Error {
    match error {
        SpeedTestPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("speed test repository unavailable: {message}"))
        }
        other => Error::internal(format!("speed test repository error: {other}")),
    }
}

#[async_trait]
impl<R, W> SpeedTestCommand for SpeedTestService<R, W>
where
    R: SpeedTestRepository + ?Sized,
    W: WeatherSource + ?Sized,
{
    async fn submit(&self, submission: SpeedTestSubmission) -> Result<SpeedTest, Error> {
        let weather = self.observe_weather(&submission).await;
        let api_key = submission.api_key.fingerprint();
        let new_test = NewSpeedTest {
            submission,
            recorded_at: self.clock.utc(),
            weather,
        };

        let stored = self
            .speed_test_repo
            .create(&new_test)
            .await
            .map_err(|err| {
                warn!(api_key = %api_key, error = %err, "failed to create speed test");
                Error::invalid_request(err.to_string())
            })?;

        info!(
            speed_test_id = stored.id,
            isp = %stored.isp,
            zipcode = %stored.zipcode,
            api_key = %api_key,
            enriched = stored.temperature.is_some(),
            "speed test recorded"
        );
        Ok(stored)
    }
}

#[async_trait]
impl<R, W> SpeedTestQuery for SpeedTestService<R, W>
where
    R: SpeedTestRepository + ?Sized,
    W: WeatherSource + ?Sized,
{
    async fn list(&self, filter: &SpeedTestFilter) -> Result<Vec<SpeedTest>, Error> {
        let tests = self
            .speed_test_repo
            .find(filter)
            .await
            .map_err(map_query_error)?;
        info!(
            isp = filter.isp(),
            zipcode = filter.zipcode(),
            count = tests.len(),
            "speed tests listed"
        );
        Ok(tests)
    }
}

#[cfg(test)]
#[path = "speed_test_service_tests.rs"]
mod tests;

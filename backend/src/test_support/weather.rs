//! Scriptable weather source.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::ports::{WeatherSource, WeatherSourceError};
use crate::domain::{WeatherObservation, Zipcode};

/// Weather source returning a fixed outcome and counting lookups.
pub struct StubWeatherSource {
    outcome: Result<WeatherObservation, WeatherSourceError>,
    calls: AtomicUsize,
}

impl StubWeatherSource {
    /// Source reporting `kelvin` and `description` for every zipcode.
    pub fn reporting(kelvin: f64, description: &str) -> Self {
        Self {
            outcome: Ok(WeatherObservation::from_provider(kelvin, description)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Source failing every lookup with `error`.
    pub fn failing(error: WeatherSourceError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl WeatherSource for StubWeatherSource {
    async fn fetch(&self, _zipcode: &Zipcode) -> Result<WeatherObservation, WeatherSourceError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        self.outcome.clone()
    }
}

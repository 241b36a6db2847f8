//! DTOs for decoding OpenWeatherMap current-weather responses.
//!
//! Only the fields the service stores are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;

use crate::domain::WeatherObservation;

#[derive(Debug, Deserialize)]
pub(super) struct CurrentWeatherDto {
    pub(super) main: MainDto,
    #[serde(default)]
    pub(super) weather: Vec<ConditionDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MainDto {
    /// Kelvin.
    pub(super) temp: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConditionDto {
    pub(super) description: String,
}

impl CurrentWeatherDto {
    pub(super) fn into_observation(self) -> Result<WeatherObservation, String> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| "payload has no weather conditions".to_owned())?;
        Ok(WeatherObservation::from_provider(
            self.main.temp,
            &condition.description,
        ))
    }
}

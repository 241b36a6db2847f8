//! Weather provider outbound adapters.
//!
//! A reqwest implementation of the `WeatherSource` port speaking the
//! OpenWeatherMap current-weather API.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_WEATHER_ENDPOINT, OpenWeatherHttpSource};

//! Weather observations attached to speed tests.
//!
//! The provider reports temperatures in Kelvin and lower-case condition
//! descriptions; these helpers turn them into the stored representation.

/// Weather at the submission's postal code when the test was ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherObservation {
    /// Whole degrees Fahrenheit, truncated toward zero.
    pub temperature: i32,
    /// Capitalised description, e.g. `"Light rain"`.
    pub condition: String,
}

impl WeatherObservation {
    /// Build an observation from raw provider values.
    ///
    /// # Examples
    /// ```
    /// use speedtest::domain::WeatherObservation;
    ///
    /// let obs = WeatherObservation::from_provider(300.0, "clear sky");
    /// assert_eq!(obs.temperature, 80);
    /// assert_eq!(obs.condition, "Clear sky");
    /// ```
    pub fn from_provider(kelvin: f64, description: &str) -> Self {
        Self {
            temperature: kelvin_to_fahrenheit(kelvin),
            condition: capitalize_condition(description),
        }
    }
}

/// Convert Kelvin to Fahrenheit, truncating toward zero.
///
/// Out-of-range inputs saturate at the `i32` bounds and NaN maps to zero.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> i32 {
    (kelvin * 9.0 / 5.0 - 459.67) as i32
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize_condition(description: &str) -> String {
    let mut chars = description.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

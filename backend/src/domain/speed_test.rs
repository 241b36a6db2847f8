//! Speed-test submissions, stored records and query filters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiKey, WeatherObservation, Zipcode};

/// Validation errors raised while building speed-test values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeedTestValidationError {
    #[error("isp must not be empty")]
    EmptyIsp,
}

/// Internet service provider name, matched exactly in queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isp(String);

impl Isp {
    /// Validate and construct an [`Isp`].
    pub fn new(value: impl Into<String>) -> Result<Self, SpeedTestValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(SpeedTestValidationError::EmptyIsp);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Isp {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Isp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Isp> for String {
    fn from(value: Isp) -> Self {
        value.0
    }
}

impl TryFrom<String> for Isp {
    type Error = SpeedTestValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Measurement as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTestSubmission {
    pub isp: Isp,
    pub zipcode: Zipcode,
    pub download: i32,
    pub upload: i32,
    pub ping: i32,
    pub api_key: ApiKey,
}

/// Submission enriched with server-side data, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpeedTest {
    pub submission: SpeedTestSubmission,
    pub recorded_at: DateTime<Utc>,
    /// `None` when the weather lookup failed.
    pub weather: Option<WeatherObservation>,
}

/// Stored speed-test record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTest {
    pub id: i64,
    pub isp: String,
    pub zipcode: String,
    pub download: i32,
    pub upload: i32,
    pub ping: i32,
    pub api_key: String,
    pub recorded_at: DateTime<Utc>,
    pub temperature: Option<i32>,
    pub condition: Option<String>,
}

/// Single exact-match condition on a speed-test column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedTestPredicate {
    Isp(String),
    Zipcode(String),
}

impl SpeedTestPredicate {
    /// Whether `test` satisfies this predicate.
    pub fn matches(&self, test: &SpeedTest) -> bool {
        match self {
            Self::Isp(isp) => test.isp == *isp,
            Self::Zipcode(zipcode) => test.zipcode == *zipcode,
        }
    }
}

/// Conjunction of optional exact-match filters.
///
/// Empty strings count as absent, so `?isp=` returns every record.
///
/// # Examples
/// ```
/// use speedtest::domain::{SpeedTestFilter, SpeedTestPredicate};
///
/// let filter = SpeedTestFilter::new(Some("Comcast".into()), Some(String::new()));
/// assert_eq!(
///     filter.predicates(),
///     vec![SpeedTestPredicate::Isp("Comcast".into())]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeedTestFilter {
    isp: Option<String>,
    zipcode: Option<String>,
}

impl SpeedTestFilter {
    /// Build a filter from optional query parameters.
    pub fn new(isp: Option<String>, zipcode: Option<String>) -> Self {
        Self {
            isp: isp.filter(|value| !value.is_empty()),
            zipcode: zipcode.filter(|value| !value.is_empty()),
        }
    }

    /// Filter requiring both columns to match.
    pub fn exact(isp: impl Into<String>, zipcode: impl Into<String>) -> Self {
        Self {
            isp: Some(isp.into()),
            zipcode: Some(zipcode.into()),
        }
    }

    pub fn isp(&self) -> Option<&str> {
        self.isp.as_deref()
    }

    pub fn zipcode(&self) -> Option<&str> {
        self.zipcode.as_deref()
    }

    /// Active predicates; an empty list selects every record.
    pub fn predicates(&self) -> Vec<SpeedTestPredicate> {
        let mut predicates = Vec::with_capacity(2);
        if let Some(isp) = &self.isp {
            predicates.push(SpeedTestPredicate::Isp(isp.clone()));
        }
        if let Some(zipcode) = &self.zipcode {
            predicates.push(SpeedTestPredicate::Zipcode(zipcode.clone()));
        }
        predicates
    }

    /// Whether `test` satisfies every active predicate.
    pub fn matches(&self, test: &SpeedTest) -> bool {
        self.predicates().iter().all(|p| p.matches(test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> SpeedTest {
        SpeedTest {
            id: 1,
            isp: "Comcast".into(),
            zipcode: "94103".into(),
            download: 100,
            upload: 20,
            ping: 15,
            api_key: "key".into(),
            recorded_at: DateTime::<Utc>::UNIX_EPOCH,
            temperature: None,
            condition: None,
        }
    }

    #[rstest]
    #[case(None, None, 0)]
    #[case(Some(""), Some(""), 0)]
    #[case(Some("Comcast"), None, 1)]
    #[case(None, Some("94103"), 1)]
    #[case(Some("Comcast"), Some("94103"), 2)]
    fn blank_parameters_are_dropped(
        #[case] isp: Option<&str>,
        #[case] zipcode: Option<&str>,
        #[case] expected: usize,
    ) {
        let filter = SpeedTestFilter::new(isp.map(str::to_owned), zipcode.map(str::to_owned));
        assert_eq!(filter.predicates().len(), expected);
    }

    #[rstest]
    #[case(SpeedTestFilter::default(), true)]
    #[case(SpeedTestFilter::exact("Comcast", "94103"), true)]
    #[case(SpeedTestFilter::exact("comcast", "94103"), false)]
    #[case(SpeedTestFilter::exact("Comcast", "10001"), false)]
    #[case(SpeedTestFilter::new(None, Some("94103".into())), true)]
    fn matching_is_exact_and_conjunctive(
        record: SpeedTest,
        #[case] filter: SpeedTestFilter,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.matches(&record), expected);
    }

    #[rstest]
    fn isp_rejects_blank() {
        assert_eq!(Isp::new(" "), Err(SpeedTestValidationError::EmptyIsp));
    }
}

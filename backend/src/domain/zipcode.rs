//! Postal code value shared by users and speed tests.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Zipcode::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZipcodeValidationError {
    #[error("zipcode must not be empty")]
    Empty,
}

/// Postal code as supplied by the client.
///
/// The value is kept verbatim (no normalisation) so query filters match the
/// stored text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Zipcode(String);

impl Zipcode {
    /// Validate and construct a [`Zipcode`].
    ///
    /// # Examples
    /// ```
    /// use speedtest::domain::Zipcode;
    ///
    /// let zip = Zipcode::new("94103").expect("valid zipcode");
    /// assert_eq!(zip.as_ref(), "94103");
    /// assert!(Zipcode::new("  ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, ZipcodeValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ZipcodeValidationError::Empty);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Zipcode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Zipcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Zipcode> for String {
    fn from(value: Zipcode) -> Self {
        value.0
    }
}

impl TryFrom<String> for Zipcode {
    type Error = ZipcodeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

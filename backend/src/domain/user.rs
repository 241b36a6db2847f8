//! User accounts and API keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::Zipcode;

/// Number of digest bytes kept when fingerprinting an API key for logs.
const FINGERPRINT_BYTES: usize = 8;

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("api key must not be empty")]
    EmptyApiKey,
}

/// Unique account name chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque credential issued once at registration.
///
/// Keys are UUID v4 strings. Lookups treat them as opaque text, so keys that
/// are not UUIDs are still accepted (they simply never match).
///
/// `Debug` prints only the fingerprint to keep raw keys out of logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKey(String);

impl ApiKey {
    /// Generate a fresh random key.
    ///
    /// # Examples
    /// ```
    /// use speedtest::domain::ApiKey;
    ///
    /// let a = ApiKey::generate();
    /// let b = ApiKey::generate();
    /// assert_ne!(a, b);
    /// assert_eq!(a.as_ref().len(), 36);
    /// ```
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a client-supplied key.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyApiKey);
        }
        Ok(Self(value))
    }

    /// Truncated SHA-256 digest, hex encoded, safe to write to logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.fingerprint()).finish()
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ApiKey> for String {
    fn from(value: ApiKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for ApiKey {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registration request after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub username: Username,
    pub zipcode: Zipcode,
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: Username,
    pub zipcode: Zipcode,
    pub api_key: ApiKey,
}

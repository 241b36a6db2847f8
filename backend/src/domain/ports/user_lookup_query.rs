//! Driving port for resolving an API key to its owner.
//!
//! Inbound adapters use this port without depending on persistence types.

use async_trait::async_trait;

use crate::domain::{ApiKey, Error, User, Username, Zipcode};

/// Domain use-case port for API-key lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserLookupQuery: Send + Sync {
    /// Return the owner of `api_key`, or a `not_found` error.
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<User, Error>;
}

/// Fixture query resolving every key to the same account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserLookupQuery;

#[async_trait]
impl UserLookupQuery for FixtureUserLookupQuery {
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<User, Error> {
        const FIXTURE_USERNAME: &str = "ada";
        const FIXTURE_ZIPCODE: &str = "94103";

        let username = Username::new(FIXTURE_USERNAME)
            .map_err(|err| Error::internal(format!("invalid fixture username: {err}")))?;
        let zipcode = Zipcode::new(FIXTURE_ZIPCODE)
            .map_err(|err| Error::internal(format!("invalid fixture zipcode: {err}")))?;
        Ok(User {
            id: 1,
            username,
            zipcode,
            api_key: api_key.clone(),
        })
    }
}

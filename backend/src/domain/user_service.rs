//! User account domain service.
//!
//! Implements registration and API-key lookup on top of a
//! [`UserRepository`]. Raw API keys never reach the logs; only their
//! fingerprints do.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    UserLookupQuery, UserPersistenceError, UserRegistrationCommand, UserRepository,
};
use crate::domain::{ApiKey, Error, User, UserRegistration};

/// Message returned when an API key has no owner.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// Registration and lookup service.
#[derive(Clone)]
pub struct UserAccountService<R> {
    user_repo: Arc<R>,
}

impl<R> UserAccountService<R> {
    /// Create a new service over `user_repo`.
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict("username already registered").with_details(json!({
                "field": "username",
                "value": username,
                "code": "duplicate_username",
            }))
        }
    }
}

#[async_trait]
impl<R> UserRegistrationCommand for UserAccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, registration: UserRegistration) -> Result<User, Error> {
        let api_key = ApiKey::generate();
        let user = self
            .user_repo
            .create(&registration, &api_key)
            .await
            .map_err(|err| {
                warn!(username = %registration.username, error = %err, "user registration failed");
                map_repository_error(err)
            })?;

        info!(
            user_id = user.id,
            username = %user.username,
            api_key = %user.api_key.fingerprint(),
            "user registered"
        );
        Ok(user)
    }
}

#[async_trait]
impl<R> UserLookupQuery for UserAccountService<R>
where
    R: UserRepository,
{
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<User, Error> {
        let found = self
            .user_repo
            .find_by_api_key(api_key)
            .await
            .map_err(map_repository_error)?;

        found.ok_or_else(|| {
            warn!(api_key = %api_key.fingerprint(), "user not found");
            Error::not_found(USER_NOT_FOUND_MESSAGE)
        })
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;

//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{ApiKey, Error, User, UserRegistration};

/// Domain use-case port for registering a user and issuing an API key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistrationCommand: Send + Sync {
    /// Register `registration`, returning the stored user including its key.
    async fn register(&self, registration: UserRegistration) -> Result<User, Error>;
}

/// Fixture command that accepts every registration without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRegistrationCommand;

#[async_trait]
impl UserRegistrationCommand for FixtureUserRegistrationCommand {
    async fn register(&self, registration: UserRegistration) -> Result<User, Error> {
        Ok(User {
            id: 1,
            username: registration.username,
            zipcode: registration.zipcode,
            api_key: ApiKey::generate(),
        })
    }
}

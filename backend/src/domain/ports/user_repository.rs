//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{ApiKey, User, UserRegistration};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username already registered: {username}",
    }
}

/// Store of registered users keyed by username and API key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with the supplied key and return the stored row.
    async fn create(
        &self,
        registration: &UserRegistration,
        api_key: &ApiKey,
    ) -> Result<User, UserPersistenceError>;

    /// Exact-match lookup by API key.
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<User>, UserPersistenceError>;
}

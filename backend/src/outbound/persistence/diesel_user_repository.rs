//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{ApiKey, User, UserRegistration, Username, Zipcode};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, classify_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure, username: Option<&str>) -> UserPersistenceError {
    match (failure, username) {
        (DieselFailure::Connection(message), _) => UserPersistenceError::connection(message),
        (DieselFailure::UniqueViolation(_), Some(username)) => {
            UserPersistenceError::duplicate_username(username)
        }
        (
            DieselFailure::UniqueViolation(message)
            | DieselFailure::ForeignKeyViolation(message)
            | DieselFailure::Query(message),
            _,
        ) => UserPersistenceError::query(message),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|err| UserPersistenceError::query(format!("stored username invalid: {err}")))?;
    let zipcode = Zipcode::new(row.zipcode)
        .map_err(|err| UserPersistenceError::query(format!("stored zipcode invalid: {err}")))?;
    let api_key = ApiKey::new(row.api_key)
        .map_err(|err| UserPersistenceError::query(format!("stored api key invalid: {err}")))?;
    Ok(User {
        id: row.id,
        username,
        zipcode,
        api_key,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        registration: &UserRegistration,
        api_key: &ApiKey,
    ) -> Result<User, UserPersistenceError> {
        let username = registration.username.as_ref();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err), None))?;

        let new_row = NewUserRow {
            username,
            zipcode: registration.zipcode.as_ref(),
            api_key: api_key.as_ref(),
        };

        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err), Some(username)))?;

        row_to_user(row)
    }

    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err), None))?;

        let row: Option<UserRow> = users::table
            .filter(users::api_key.eq(api_key.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err), None))?;

        row.map(row_to_user).transpose()
    }
}

//! Classification of Diesel and pool failures shared by the repositories.
//!
//! Repositories turn a [`DieselFailure`] into their own port error so the
//! constraint-specific variants (duplicate username, unknown API key) are
//! decided in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be obtained.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation(String),
    /// Any other query failure.
    Query(String),
}

pub(crate) fn classify_pool_error(error: PoolError) -> DieselFailure {
    DieselFailure::Connection(error.message().to_owned())
}

pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            let message = info.message().to_owned();
            debug!(?kind, message = %message, constraint = info.constraint_name(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation(message),
                DatabaseErrorKind::ForeignKeyViolation => {
                    DieselFailure::ForeignKeyViolation(message)
                }
                DatabaseErrorKind::ClosedConnection => DieselFailure::Connection(message),
                _ => DieselFailure::Query(message),
            }
        }
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            DieselFailure::Query(other.to_string())
        }
    }
}

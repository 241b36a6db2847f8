//! PostgreSQL-backed `SpeedTestRepository` implementation using Diesel ORM.
//!
//! Reads fold the filter's predicate list into a boxed query, so every
//! condition is a bound parameter and absent predicates add nothing.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SpeedTestPersistenceError, SpeedTestRepository};
use crate::domain::{NewSpeedTest, SpeedTest, SpeedTestFilter, SpeedTestPredicate};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, classify_pool_error};
use super::models::{NewSpeedTestRow, SpeedTestRow};
use super::pool::DbPool;
use super::schema::speedtests;

/// Diesel-backed implementation of the `SpeedTestRepository` port.
#[derive(Clone)]
pub struct DieselSpeedTestRepository {
    pool: DbPool,
}

impl DieselSpeedTestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure) -> SpeedTestPersistenceError {
    match failure {
        DieselFailure::Connection(message) => SpeedTestPersistenceError::connection(message),
        DieselFailure::ForeignKeyViolation(message) => {
            SpeedTestPersistenceError::unknown_api_key(message)
        }
        DieselFailure::UniqueViolation(message) | DieselFailure::Query(message) => {
            SpeedTestPersistenceError::query(message)
        }
    }
}

fn row_to_speed_test(row: SpeedTestRow) -> SpeedTest {
    SpeedTest {
        id: row.id,
        isp: row.isp,
        zipcode: row.zipcode,
        download: row.download,
        upload: row.upload,
        ping: row.ping,
        api_key: row.api_key,
        recorded_at: row.timestamp,
        temperature: row.temperature,
        condition: row.condition,
    }
}

fn filtered_query(filter: &SpeedTestFilter) -> speedtests::BoxedQuery<'static, Pg> {
    filter
        .predicates()
        .into_iter()
        .fold(speedtests::table.into_boxed(), |query, predicate| {
            match predicate {
                SpeedTestPredicate::Isp(isp) => query.filter(speedtests::isp.eq(isp)),
                SpeedTestPredicate::Zipcode(zipcode) => {
                    query.filter(speedtests::zipcode.eq(zipcode))
                }
            }
        })
        .order(speedtests::id.asc())
}

#[async_trait]
impl SpeedTestRepository for DieselSpeedTestRepository {
    async fn create(
        &self,
        speed_test: &NewSpeedTest,
    ) -> Result<SpeedTest, SpeedTestPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let submission = &speed_test.submission;
        let new_row = NewSpeedTestRow {
            isp: submission.isp.as_ref(),
            zipcode: submission.zipcode.as_ref(),
            download: submission.download,
            upload: submission.upload,
            ping: submission.ping,
            api_key: submission.api_key.as_ref(),
            timestamp: speed_test.recorded_at,
            temperature: speed_test.weather.as_ref().map(|w| w.temperature),
            condition: speed_test.weather.as_ref().map(|w| w.condition.as_str()),
        };

        let row = diesel::insert_into(speedtests::table)
            .values(&new_row)
            .returning(SpeedTestRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        Ok(row_to_speed_test(row))
    }

    async fn find(
        &self,
        filter: &SpeedTestFilter,
    ) -> Result<Vec<SpeedTest>, SpeedTestPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<SpeedTestRow> = filtered_query(filter)
            .select(SpeedTestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        Ok(rows.into_iter().map(row_to_speed_test).collect())
    }
}

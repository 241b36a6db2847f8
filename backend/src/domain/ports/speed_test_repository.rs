//! Port for speed-test persistence.

use async_trait::async_trait;

use crate::domain::{NewSpeedTest, SpeedTest, SpeedTestFilter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by speed-test repository adapters.
    pub enum SpeedTestPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "speed test repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "speed test repository query failed: {message}",
        /// The submission references an API key with no matching user.
        UnknownApiKey { message: String } =>
            "speed test references an unknown api key: {message}",
    }
}

/// Append-only store of speed-test records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeedTestRepository: Send + Sync {
    /// Insert a record and return it with its assigned id.
    async fn create(&self, speed_test: &NewSpeedTest)
    -> Result<SpeedTest, SpeedTestPersistenceError>;

    /// Records matching every predicate of `filter`, ordered by id.
    async fn find(
        &self,
        filter: &SpeedTestFilter,
    ) -> Result<Vec<SpeedTest>, SpeedTestPersistenceError>;
}

//! Driving port for speed-test reads.

use async_trait::async_trait;

use crate::domain::{Error, SpeedTest, SpeedTestFilter};

/// Domain use-case port for listing stored speed tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeedTestQuery: Send + Sync {
    /// Records matching `filter`, ordered by id.
    async fn list(&self, filter: &SpeedTestFilter) -> Result<Vec<SpeedTest>, Error>;
}

/// Fixture query with no stored records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSpeedTestQuery;

#[async_trait]
impl SpeedTestQuery for FixtureSpeedTestQuery {
    async fn list(&self, _filter: &SpeedTestFilter) -> Result<Vec<SpeedTest>, Error> {
        Ok(Vec::new())
    }
}

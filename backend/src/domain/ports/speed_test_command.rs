//! Driving port for speed-test ingestion.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, SpeedTest, SpeedTestSubmission};

/// Domain use-case port for recording a submitted measurement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeedTestCommand: Send + Sync {
    /// Enrich and store `submission`, returning the stored record.
    async fn submit(&self, submission: SpeedTestSubmission) -> Result<SpeedTest, Error>;
}

/// Fixture command that acknowledges submissions without weather data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSpeedTestCommand;

#[async_trait]
impl SpeedTestCommand for FixtureSpeedTestCommand {
    async fn submit(&self, submission: SpeedTestSubmission) -> Result<SpeedTest, Error> {
        Ok(SpeedTest {
            id: 1,
            isp: submission.isp.into(),
            zipcode: submission.zipcode.into(),
            download: submission.download,
            upload: submission.upload,
            ping: submission.ping,
            api_key: submission.api_key.into(),
            recorded_at: Utc::now(),
            temperature: None,
            condition: None,
        })
    }
}

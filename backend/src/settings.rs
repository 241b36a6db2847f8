//! Service configuration loaded via OrthoConfig.
//!
//! Every value can be supplied as a `SPEEDTEST_*` environment variable or a
//! command-line flag. Only the database URL is mandatory; the accessors fall
//! back to defaults for everything else.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::RateLimitPolicy;
use crate::outbound::persistence::PoolConfig;
use crate::outbound::weather::DEFAULT_WEATHER_ENDPOINT;

const DEFAULT_REDIS_HOST: &str = "redis";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;

/// Errors raised when settings are present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("SPEEDTEST_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid weather endpoint `{value}`: {message}")]
    InvalidWeatherEndpoint { value: String, message: String },
    #[error("invalid bind address `{value}`: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Runtime settings for the speed-test service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SPEEDTEST")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// OpenWeatherMap API key; enrichment is disabled when absent.
    pub weather_api_key: Option<String>,
    /// Override for the current-weather endpoint.
    pub weather_endpoint: Option<String>,
    /// Whole-request timeout for weather lookups, in seconds.
    #[ortho_config(default = 10)]
    pub weather_timeout_secs: u64,
    /// Redis host holding the rate-limit counters.
    pub redis_host: Option<String>,
    /// Redis port.
    pub redis_port: Option<u16>,
    /// Address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Requests admitted per client and window.
    pub rate_limit_max_requests: Option<u64>,
    /// Window length in seconds.
    pub rate_limit_window_secs: Option<u64>,
    /// Maximum pooled database connections.
    pub db_pool_max_size: Option<u32>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            weather_api_key: None,
            weather_endpoint: None,
            weather_timeout_secs: DEFAULT_WEATHER_TIMEOUT_SECS,
            redis_host: None,
            redis_port: None,
            bind_addr: None,
            rate_limit_max_requests: None,
            rate_limit_window_secs: None,
            db_pool_max_size: None,
        }
    }
}

impl AppSettings {
    /// Return the database URL or fail when it is missing.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Database pool configuration built from the URL and optional size cap.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let config = PoolConfig::new(self.database_url()?);
        Ok(match self.db_pool_max_size {
            Some(max_size) => config.with_max_size(max_size),
            None => config,
        })
    }

    /// Return the weather API key when one is configured.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Return the configured weather endpoint, falling back to OpenWeatherMap.
    pub fn weather_endpoint(&self) -> Result<Url, SettingsError> {
        let raw = self
            .weather_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_WEATHER_ENDPOINT);
        Url::parse(raw).map_err(|err| SettingsError::InvalidWeatherEndpoint {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_secs)
    }

    pub fn redis_host(&self) -> &str {
        self.redis_host.as_deref().unwrap_or(DEFAULT_REDIS_HOST)
    }

    pub fn redis_port(&self) -> u16 {
        self.redis_port.unwrap_or(DEFAULT_REDIS_PORT)
    }

    /// Return the socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Rate-limit policy, defaulting to 10 requests per 60 seconds.
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            self.rate_limit_max_requests
                .unwrap_or(RateLimitPolicy::DEFAULT_MAX_REQUESTS),
            self.rate_limit_window_secs
                .map_or(RateLimitPolicy::DEFAULT_WINDOW, Duration::from_secs),
        )
    }
}

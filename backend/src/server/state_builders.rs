//! Builders wiring outbound adapters into domain services.

use std::sync::Arc;

use actix_web::web;

use speedtest::domain::ports::RateLimiter;
use speedtest::domain::{RateLimiterService, SpeedTestService, UserAccountService};
use speedtest::inbound::http::state::{HttpState, HttpStatePorts};
use speedtest::outbound::persistence::{DieselSpeedTestRepository, DieselUserRepository};

use super::ServerConfig;

/// Build handler state backed by the Diesel repositories.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let accounts = Arc::new(UserAccountService::new(Arc::new(
        DieselUserRepository::new(config.db_pool.clone()),
    )));
    let speed_tests = Arc::new(SpeedTestService::new(
        Arc::new(DieselSpeedTestRepository::new(config.db_pool.clone())),
        config.weather.clone(),
        config.clock.clone(),
    ));

    web::Data::new(HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        user_lookup: accounts,
        speed_tests: speed_tests.clone(),
        speed_tests_query: speed_tests,
    }))
}

/// Build the limiter consulted by the rate-limit middleware.
pub(crate) fn build_rate_limiter(config: &ServerConfig) -> Arc<dyn RateLimiter> {
    Arc::new(RateLimiterService::new(
        config.rate_limit_store.clone(),
        config.rate_limit_policy,
    ))
}

//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureSpeedTestCommand, FixtureSpeedTestQuery, FixtureUserLookupQuery,
    FixtureUserRegistrationCommand, SpeedTestCommand, SpeedTestQuery, UserLookupQuery,
    UserRegistrationCommand,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub registration: Arc<dyn UserRegistrationCommand>,
    pub user_lookup: Arc<dyn UserLookupQuery>,
    pub speed_tests: Arc<dyn SpeedTestCommand>,
    pub speed_tests_query: Arc<dyn SpeedTestQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn UserRegistrationCommand>,
    pub user_lookup: Arc<dyn UserLookupQuery>,
    pub speed_tests: Arc<dyn SpeedTestCommand>,
    pub speed_tests_query: Arc<dyn SpeedTestQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use speedtest::domain::ports::{
    ///     FixtureSpeedTestCommand, FixtureSpeedTestQuery, FixtureUserLookupQuery,
    ///     FixtureUserRegistrationCommand,
    /// };
    /// use speedtest::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     registration: Arc::new(FixtureUserRegistrationCommand),
    ///     user_lookup: Arc::new(FixtureUserLookupQuery),
    ///     speed_tests: Arc::new(FixtureSpeedTestCommand),
    ///     speed_tests_query: Arc::new(FixtureSpeedTestQuery),
    /// });
    /// let _lookup = state.user_lookup.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            registration,
            user_lookup,
            speed_tests,
            speed_tests_query,
        } = ports;
        Self {
            registration,
            user_lookup,
            speed_tests,
            speed_tests_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

/// Fixture-backed state for wiring without storage.
impl Default for HttpState {
    fn default() -> Self {
        Self::new(HttpStatePorts {
            registration: Arc::new(FixtureUserRegistrationCommand),
            user_lookup: Arc::new(FixtureUserLookupQuery),
            speed_tests: Arc::new(FixtureSpeedTestCommand),
            speed_tests_query: Arc::new(FixtureSpeedTestQuery),
        })
    }
}

//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the user and speed-test endpoints on `cfg`.
///
/// Extractor configuration is included so malformed requests are reported in
/// the shared error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use speedtest::inbound::http::{routes, state::HttpState};
///
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::default()))
///     .configure(routes);
/// ```
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(users::create_user)
        .service(users::read_user)
        .service(speed_tests::create_speed_test)
        .service(speed_tests::list_speed_tests)
        .service(speed_tests::list_speed_tests_by_isp_and_zipcode);
}

//! End-to-end HTTP coverage over in-memory adapters.
//!
//! The app is assembled the way the server binary does it: `Trace`
//! outermost, then `RateLimit` with the health probes exempt, then the routes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use speedtest::domain::ports::WeatherSourceError;
use speedtest::domain::{
    RateLimitPolicy, RateLimiterService, SpeedTestService, TRACE_ID_HEADER, UserAccountService,
};
use speedtest::inbound::http::health::{HEALTH_PATH_PREFIX, HealthState, live, ready};
use speedtest::inbound::http::routes;
use speedtest::inbound::http::state::{HttpState, HttpStatePorts};
use speedtest::test_support::{
    InMemoryRateLimitStore, InMemorySpeedTestRepository, InMemoryUserRepository, MutableClock,
    StubWeatherSource,
};
use speedtest::{RateLimit, Trace};

struct Harness {
    clock: Arc<MutableClock>,
    speed_tests: Arc<InMemorySpeedTestRepository>,
    weather: Arc<StubWeatherSource>,
    state: HttpState,
    limiter: Arc<RateLimiterService<InMemoryRateLimitStore>>,
}

impl Harness {
    fn new(weather: StubWeatherSource) -> Self {
        let start: DateTime<Utc> = "2024-05-01T12:00:00Z".parse().expect("start time");
        let clock = Arc::new(MutableClock::new(start));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let users = Arc::new(InMemoryUserRepository::new());
        let speed_tests = Arc::new(InMemorySpeedTestRepository::new(users.clone()));
        let weather = Arc::new(weather);

        let accounts = Arc::new(UserAccountService::new(users));
        let service = Arc::new(SpeedTestService::new(
            speed_tests.clone(),
            weather.clone(),
            dyn_clock.clone(),
        ));
        let state = HttpState::new(HttpStatePorts {
            registration: accounts.clone(),
            user_lookup: accounts,
            speed_tests: service.clone(),
            speed_tests_query: service,
        });
        let limiter = Arc::new(RateLimiterService::new(
            InMemoryRateLimitStore::new(dyn_clock),
            RateLimitPolicy::default(),
        ));

        Self {
            clock,
            speed_tests,
            weather,
            state,
            limiter,
        }
    }

    async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
    {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        actix_test::init_service(
            App::new()
                .app_data(health)
                .app_data(web::Data::new(self.state.clone()))
                .configure(routes)
                .service(ready)
                .service(live)
                .wrap(RateLimit::new(self.limiter.clone()).exempt_path_prefix(HEALTH_PATH_PREFIX))
                .wrap(Trace),
        )
        .await
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new(StubWeatherSource::reporting(288.0, "light rain"))
}

fn peer(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([198, 51, 100, last_octet], 40000))
}

async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    assert!(
        response.headers().contains_key(TRACE_ID_HEADER),
        "every response carries a trace id"
    );
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

async fn register<S>(app: &S, username: &str, zipcode: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/users/")
            .peer_addr(peer(1))
            .set_json(json!({"username": username, "zipcode": zipcode})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["api_key"].as_str().expect("api key").to_owned()
}

fn upload(api_key: &str, isp: &str, zipcode: &str, client: u8) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/speedtests/")
        .peer_addr(peer(client))
        .set_json(json!({
            "isp": isp,
            "zipcode": zipcode,
            "download": 500,
            "upload": 20,
            "ping": 12,
            "api_key": api_key,
        }))
}

fn get(uri: &str, client: u8) -> actix_test::TestRequest {
    actix_test::TestRequest::get().uri(uri).peer_addr(peer(client))
}

#[rstest]
#[actix_web::test]
async fn register_upload_and_query(harness: Harness) {
    let app = harness.app().await;
    let api_key = register(&app, "alice", "94105").await;

    let (status, body) = send(&app, get(&format!("/users/{api_key}"), 2)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "alice", "zipcode": "94105"}));

    let (status, body) = send(&app, upload(&api_key, "Comcast", "94105", 2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Successful upload"}));

    let (status, body) = send(&app, get("/speedtests/?zipcode=94105", 2)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "isp": "Comcast",
            "zipcode": "94105",
            "download": 500,
            "upload": 20,
            "ping": 12,
            "timestamp": "2024-05-01T12:00:00Z",
            "temperature": 58,
            "condition": "Light rain",
        }])
    );
    assert_eq!(harness.weather.calls(), 1);
}

#[rstest]
#[actix_web::test]
async fn api_keys_are_unique(harness: Harness) {
    let app = harness.app().await;
    let first = register(&app, "alice", "94105").await;
    let second = register(&app, "bob", "94105").await;
    assert_ne!(first, second);
}

#[rstest]
#[actix_web::test]
async fn duplicate_username_is_rejected_without_a_record(harness: Harness) {
    let app = harness.app().await;
    let original = register(&app, "alice", "94105").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users/")
            .peer_addr(peer(3))
            .set_json(json!({"username": "alice", "zipcode": "10001"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["field"], "username");

    let (_, body) = send(&app, get(&format!("/users/{original}"), 3)).await;
    assert_eq!(body["zipcode"], "94105");
}

#[rstest]
#[actix_web::test]
async fn unknown_api_key_lookup_is_not_found(harness: Harness) {
    let app = harness.app().await;
    let (status, body) = send(&app, get("/users/not-a-key", 4)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn upload_for_unknown_key_is_bad_request(harness: Harness) {
    let app = harness.app().await;
    let (status, body) = send(&app, upload("missing", "Comcast", "94105", 5)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert!(harness.speed_tests.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn weather_failure_stores_null_weather() {
    let harness = Harness::new(StubWeatherSource::failing(WeatherSourceError::unavailable(
        401_u16,
    )));
    let app = harness.app().await;
    let api_key = register(&app, "alice", "94105").await;

    let (status, _) = send(&app, upload(&api_key, "Comcast", "94105", 6)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, get("/speedtests/", 6)).await;
    let record = body.get(0).expect("one record");
    assert!(record["temperature"].is_null());
    assert!(record["condition"].is_null());
}

#[rstest]
#[actix_web::test]
async fn filters_are_exact_and_conjunctive(harness: Harness) {
    let app = harness.app().await;
    let api_key = register(&app, "alice", "94105").await;
    for (isp, zipcode) in [("Comcast", "94105"), ("Comcast", "10001"), ("Sonic", "94105")] {
        let (status, _) = send(&app, upload(&api_key, isp, zipcode, 7)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let count = |body: &Value| body.as_array().map_or(0, Vec::len);
    let (_, all) = send(&app, get("/speedtests/", 8)).await;
    assert_eq!(count(&all), 3);
    let (_, by_isp) = send(&app, get("/speedtests/?isp=Comcast", 8)).await;
    assert_eq!(count(&by_isp), 2);
    let (_, lowercase) = send(&app, get("/speedtests/?isp=comcast", 8)).await;
    assert_eq!(count(&lowercase), 0);
    let (_, both) = send(&app, get("/speedtests/?isp=Comcast&zipcode=94105", 8)).await;
    assert_eq!(count(&both), 1);
    let (_, by_path) = send(&app, get("/speedtests/Sonic/94105", 8)).await;
    assert_eq!(count(&by_path), 1);
    assert_eq!(by_path[0]["isp"], "Sonic");
}

#[rstest]
#[actix_web::test]
async fn eleventh_request_in_a_window_is_rejected(harness: Harness) {
    let app = harness.app().await;
    for _ in 0..10 {
        let (status, _) = send(&app, get("/speedtests/", 9)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get("/speedtests/", 9)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["message"], "Too many requests");

    let (status, _) = send(&app, get("/speedtests/", 10)).await;
    assert_eq!(status, StatusCode::OK, "other clients keep their own budget");

    harness.clock.advance(Duration::from_secs(61));
    let (status, _) = send(&app, get("/speedtests/", 9)).await;
    assert_eq!(status, StatusCode::OK, "window expiry resets the budget");
}

#[rstest]
#[actix_web::test]
async fn rejected_requests_do_not_reach_handlers(harness: Harness) {
    let app = harness.app().await;
    for _ in 0..10 {
        send(&app, get("/speedtests/", 11)).await;
    }
    let (status, _) = send(&app, upload("missing", "Comcast", "94105", 11)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(harness.weather.calls(), 0);
}

#[rstest]
#[actix_web::test]
async fn health_probes_are_never_rate_limited(harness: Harness) {
    let app = harness.app().await;
    for _ in 0..15 {
        let (status, _) = send(&app, get("/health/ready", 12)).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(&app, get("/health/live", 12)).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..10 {
        let (status, _) = send(&app, get("/speedtests/", 12)).await;
        assert_eq!(status, StatusCode::OK, "probes did not consume the budget");
    }
    let (status, _) = send(&app, get("/speedtests/", 12)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

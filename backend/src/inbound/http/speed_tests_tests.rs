//! Tests for speed-test API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::TimeZone;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    FixtureSpeedTestCommand, FixtureSpeedTestQuery, FixtureUserLookupQuery,
    FixtureUserRegistrationCommand, MockSpeedTestCommand, MockSpeedTestQuery, SpeedTestCommand,
    SpeedTestQuery,
};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::validation::{json_config, query_config};

const KEY: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn state_with(
    speed_tests: Arc<dyn SpeedTestCommand>,
    speed_tests_query: Arc<dyn SpeedTestQuery>,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        registration: Arc::new(FixtureUserRegistrationCommand),
        user_lookup: Arc::new(FixtureUserLookupQuery),
        speed_tests,
        speed_tests_query,
    })
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .service(create_speed_test)
        .service(list_speed_tests)
        .service(list_speed_tests_by_isp_and_zipcode)
}

#[fixture]
fn submission_body() -> Value {
    json!({
        "isp": "Comcast",
        "zipcode": "94105",
        "download": 500,
        "upload": 20,
        "ping": 12,
        "api_key": KEY,
    })
}

#[fixture]
fn stored() -> SpeedTest {
    SpeedTest {
        id: 3,
        isp: "Comcast".into(),
        zipcode: "94105".into(),
        download: 500,
        upload: 20,
        ping: 12,
        api_key: KEY.into(),
        recorded_at: Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp"),
        temperature: Some(61),
        condition: Some("Light rain".into()),
    }
}

#[rstest]
#[actix_web::test]
async fn upload_is_acknowledged(submission_body: Value, stored: SpeedTest) {
    let mut command = MockSpeedTestCommand::new();
    command
        .expect_submit()
        .withf(|submission| {
            submission.isp.as_ref() == "Comcast"
                && submission.zipcode.as_ref() == "94105"
                && (submission.download, submission.upload, submission.ping) == (500, 20, 12)
                && submission.api_key.as_ref() == KEY
        })
        .times(1)
        .return_once(move |_| Ok(stored));
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(command),
        Arc::new(FixtureSpeedTestQuery),
    )))
    .await;

    let request = actix_test::TestRequest::post()
        .uri("/speedtests/")
        .set_json(submission_body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"message": UPLOAD_ACKNOWLEDGEMENT}));
}

#[rstest]
#[case("isp", json!(""), "empty_field")]
#[case("zipcode", json!(" "), "empty_field")]
#[case("api_key", json!(""), "empty_field")]
#[case("download", json!("fast"), "malformed_body")]
#[case("ping", json!(1.5), "malformed_body")]
#[actix_web::test]
async fn invalid_uploads_are_rejected_before_ingestion(
    mut submission_body: Value,
    #[case] field: &str,
    #[case] value: Value,
    #[case] code: &str,
) {
    if let Some(object) = submission_body.as_object_mut() {
        object.insert(field.to_owned(), value);
    }
    let mut command = MockSpeedTestCommand::new();
    command.expect_submit().never();
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(command),
        Arc::new(FixtureSpeedTestQuery),
    )))
    .await;

    let request = actix_test::TestRequest::post()
        .uri("/speedtests/")
        .set_json(submission_body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn storage_rejection_is_bad_request(submission_body: Value) {
    let mut command = MockSpeedTestCommand::new();
    command.expect_submit().times(1).return_once(|_| {
        Err(Error::invalid_request(
            "api key is not registered: violates foreign key constraint",
        ))
    });
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(command),
        Arc::new(FixtureSpeedTestQuery),
    )))
    .await;

    let request = actix_test::TestRequest::post()
        .uri("/speedtests/")
        .set_json(submission_body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("foreign key"))
    );
}

#[rstest]
#[case("/speedtests/", SpeedTestFilter::default())]
#[case("/speedtests/?isp=Comcast", SpeedTestFilter::new(Some("Comcast".into()), None))]
#[case("/speedtests/?zipcode=94105", SpeedTestFilter::new(None, Some("94105".into())))]
#[case("/speedtests/?isp=&zipcode=94105", SpeedTestFilter::new(None, Some("94105".into())))]
#[case("/speedtests/?isp=AT%26T&zipcode=94105", SpeedTestFilter::exact("AT&T", "94105"))]
#[case("/speedtests/Comcast/94105", SpeedTestFilter::exact("Comcast", "94105"))]
#[actix_web::test]
async fn queries_translate_to_filters(
    stored: SpeedTest,
    #[case] uri: &str,
    #[case] expected: SpeedTestFilter,
) {
    let mut query = MockSpeedTestQuery::new();
    query
        .expect_list()
        .with(eq(expected))
        .times(1)
        .return_once(move |_| Ok(vec![stored]));
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(FixtureSpeedTestCommand),
        Arc::new(query),
    )))
    .await;

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!([{
            "isp": "Comcast",
            "zipcode": "94105",
            "download": 500,
            "upload": 20,
            "ping": 12,
            "timestamp": "2024-05-01T12:30:00Z",
            "temperature": 61,
            "condition": "Light rain",
        }])
    );
}

#[rstest]
#[actix_web::test]
async fn records_without_weather_serialise_nulls(mut stored: SpeedTest) {
    stored.temperature = None;
    stored.condition = None;
    let mut query = MockSpeedTestQuery::new();
    query
        .expect_list()
        .times(1)
        .return_once(move |_| Ok(vec![stored]));
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(FixtureSpeedTestCommand),
        Arc::new(query),
    )))
    .await;

    let request = actix_test::TestRequest::get()
        .uri("/speedtests/")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    let body: Value = actix_test::read_body_json(response).await;
    let record = body.get(0).expect("one record");
    assert!(record["temperature"].is_null());
    assert!(record["condition"].is_null());
    assert!(record.get("api_key").is_none());
}

#[rstest]
#[actix_web::test]
async fn storage_outage_on_query_is_unavailable() {
    let mut query = MockSpeedTestQuery::new();
    query
        .expect_list()
        .times(1)
        .return_once(|_| Err(Error::service_unavailable("database down")));
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(FixtureSpeedTestCommand),
        Arc::new(query),
    )))
    .await;

    let request = actix_test::TestRequest::get()
        .uri("/speedtests/")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer (users,
//! speed tests, health) and the error schema wrappers that keep domain types
//! free of utoipa derives.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Speed-test ingestion API",
        description = "Register users, upload weather-enriched speed tests and query them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::read_user,
        crate::inbound::http::speed_tests::create_speed_test,
        crate::inbound::http::speed_tests::list_speed_tests,
        crate::inbound::http::speed_tests::list_speed_tests_by_isp_and_zipcode,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "users", description = "Account registration and lookup"),
        (name = "speedtests", description = "Measurement upload and queries"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        matches!(schema, RefOr::T(Schema::Object(obj)) if obj.properties.contains_key(field))
    }

    #[rstest]
    fn error_schema_is_registered_with_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        for field in ["code", "message", "traceId", "details"] {
            assert!(object_has_field(error_schema, field), "missing {field}");
        }
    }

    #[rstest]
    #[case("/users/")]
    #[case("/users/{api_key}")]
    #[case("/speedtests/")]
    #[case("/speedtests/{isp}/{zipcode}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn request_and_response_bodies_are_collected() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        for name in [
            "UserCreateRequest",
            "UserCreatedResponse",
            "UserReadResponse",
            "SpeedTestCreateRequest",
            "UploadAcknowledgement",
            "SpeedTestReadResponse",
        ] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}

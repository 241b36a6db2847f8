//! Shared validation helpers for inbound HTTP adapters.
//!
//! Extractor failures and blank fields both surface as `invalid_request`
//! errors carrying a `details` object with the offending field (when known)
//! and a machine-readable `code`.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{
    Error, SpeedTestValidationError, UserValidationError, ZipcodeValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyField,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const ZIPCODE: FieldName = FieldName::new("zipcode");
pub(crate) const ISP: FieldName = FieldName::new("isp");
pub(crate) const API_KEY: FieldName = FieldName::new("api_key");

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must not be empty")).with_details(json!({
        "field": field,
        "code": ErrorCode::EmptyField.as_str(),
    }))
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    match err {
        UserValidationError::EmptyUsername => empty_field_error(USERNAME),
        UserValidationError::EmptyApiKey => empty_field_error(API_KEY),
    }
}

pub(crate) fn map_zipcode_validation_error(err: ZipcodeValidationError) -> Error {
    match err {
        ZipcodeValidationError::Empty => empty_field_error(ZIPCODE),
    }
}

pub(crate) fn map_speed_test_validation_error(err: SpeedTestValidationError) -> Error {
    match err {
        SpeedTestValidationError::EmptyIsp => empty_field_error(ISP),
    }
}

fn malformed(code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejected request body");
    malformed(ErrorCode::MalformedBody, err.to_string()).into()
}

fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejected query string");
    malformed(ErrorCode::MalformedQuery, err.to_string()).into()
}

/// JSON extractor configuration reporting failures in the error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration reporting failures in the error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

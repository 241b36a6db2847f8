//! Users API handlers.
//!
//! ```text
//! POST /users/ {"username":"ada","zipcode":"94103"}
//! GET /users/{api_key}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ApiKey, Error, USER_NOT_FOUND_MESSAGE, User, UserRegistration, Username, Zipcode,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_user_validation_error, map_zipcode_validation_error};

/// Registration request body for `POST /users/`.
///
/// Example JSON:
/// `{"username":"ada","zipcode":"94103"}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserCreateRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "94103")]
    pub zipcode: String,
}

impl TryFrom<UserCreateRequest> for UserRegistration {
    type Error = Error;

    fn try_from(value: UserCreateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::new(value.username).map_err(map_user_validation_error)?,
            zipcode: Zipcode::new(value.zipcode).map_err(map_zipcode_validation_error)?,
        })
    }
}

/// Registered account, including the only copy of its API key the client
/// will ever be shown.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserCreatedResponse {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "94103")]
    pub zipcode: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub api_key: String,
}

impl From<User> for UserCreatedResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username.into(),
            zipcode: user.zipcode.into(),
            api_key: user.api_key.into(),
        }
    }
}

/// Public view of an account.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserReadResponse {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "94103")]
    pub zipcode: String,
}

impl From<User> for UserReadResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username.into(),
            zipcode: user.zipcode.into(),
        }
    }
}

/// Register a user and issue an API key.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = UserCreateRequest,
    responses(
        (status = 200, description = "User registered", body = UserCreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username already registered", body = ErrorSchema),
        (status = 429, description = "Too many requests", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserCreateRequest>,
) -> ApiResult<web::Json<UserCreatedResponse>> {
    let registration = UserRegistration::try_from(payload.into_inner())?;
    let user = state.registration.register(registration).await?;
    Ok(web::Json(UserCreatedResponse::from(user)))
}

/// Look up the account owning an API key.
///
/// Keys are compared as opaque text; a blank key is reported as unknown.
#[utoipa::path(
    get,
    path = "/users/{api_key}",
    params(("api_key" = String, Path, description = "Key issued at registration")),
    responses(
        (status = 200, description = "Account details", body = UserReadResponse),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 429, description = "Too many requests", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "readUser"
)]
#[get("/users/{api_key}")]
pub async fn read_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserReadResponse>> {
    let api_key =
        ApiKey::new(path.into_inner()).map_err(|_| Error::not_found(USER_NOT_FOUND_MESSAGE))?;
    let user = state.user_lookup.find_by_api_key(&api_key).await?;
    Ok(web::Json(UserReadResponse::from(user)))
}

//! Login and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"nikos","password":"...","deviceToken":"..."}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::{DeviceToken, Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Push registration token of the device logging in.
    #[serde(default)]
    pub device_token: Option<String>,
}

/// Body returned by a successful login.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    #[schema(value_type = UserSchema)]
    pub user: User,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn parse_device_token(raw: Option<String>) -> Result<Option<DeviceToken>, Error> {
    raw.map(|raw| {
        DeviceToken::new(raw).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "deviceToken", "code": "invalid_device_token" }))
        })
    })
    .transpose()
}

/// Authenticate and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest {
        username,
        password,
        device_token,
    } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(map_login_validation_error)?;
    let device_token = parse_device_token(device_token)?;

    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(&user)?;
    info!(user_id = %user.id(), "user logged in");

    if let Some(token) = device_token {
        if let Err(error) = state.devices.register_device(&token).await {
            warn!(user_id = %user.id(), %error, "device registration failed at login");
        }
    }
    Ok(web::Json(LoginResponse { user }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session ended")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.end();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

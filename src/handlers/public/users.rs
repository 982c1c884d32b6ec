// handlers/public/users.rs - registration and login

use serde::Deserialize;
use validator::Validate;

use axum::extract::State;

use crate::api::{not_blank, ValidatedJson};
use crate::app::AppState;
use crate::auth::{self, password};
use crate::config;
use crate::database::models::{NewUser, User};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "The username field is required."),
        custom(function = "not_blank", message = "The username field is required."),
        length(max = 100, message = "The username field must not be greater than 100 characters.")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        custom(function = "not_blank", message = "The password field is required."),
        length(max = 100, message = "The password field must not be greater than 100 characters.")
    )]
    pub password: Option<String>,

    #[validate(
        required(message = "The name field is required."),
        custom(function = "not_blank", message = "The name field is required."),
        length(max = 100, message = "The name field must not be greater than 100 characters.")
    )]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "The username field is required."),
        custom(function = "not_blank", message = "The username field is required."),
        length(max = 100, message = "The username field must not be greater than 100 characters.")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        custom(function = "not_blank", message = "The password field is required."),
        length(max = 100, message = "The password field must not be greater than 100 characters.")
    )]
    pub password: Option<String>,
}

const USERNAME_TAKEN: &str = "username already registered";

/// POST /api/users - register a new account (201, no token yet)
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<User> {
    let username = body.username.unwrap_or_default();

    if state.store.find_user_by_username(&username).await?.is_some() {
        return Err(ApiError::field_error("username", USERNAME_TAKEN));
    }

    let new_user = NewUser {
        username,
        password: password::hash_password(&body.password.unwrap_or_default())?,
        name: body.name.unwrap_or_default(),
    };

    // The pre-check can race with a concurrent registration
    let user = state.store.insert_user(new_user).await.map_err(|e| match e {
        DatabaseError::Conflict(_) => ApiError::field_error("username", USERNAME_TAKEN),
        other => other.into(),
    })?;

    tracing::info!("Registered user {} ({})", user.id, user.username);
    Ok(ApiResponse::created(user))
}

/// POST /api/users/login - verify credentials and issue a fresh token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<User> {
    let username = body.username.unwrap_or_default();
    let user = auth::login(state.store.as_ref(), &username, &body.password.unwrap_or_default()).await?;

    if config::config().security.enable_audit_logging {
        tracing::info!("User {} logged in", user.id);
    }
    Ok(ApiResponse::success(user))
}

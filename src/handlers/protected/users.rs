// handlers/protected/users.rs - /api/users/current and /api/users/logout

use axum::extract::{Extension, State};
use serde::Deserialize;
use validator::Validate;

use crate::api::{not_blank, ValidatedJson};
use crate::app::AppState;
use crate::auth::{self, password};
use crate::config;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        custom(function = "not_blank", message = "The name field is required."),
        length(max = 100, message = "The name field must not be greater than 100 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        custom(function = "not_blank", message = "The password field is required."),
        length(max = 100, message = "The password field must not be greater than 100 characters.")
    )]
    pub password: Option<String>,
}

/// GET /api/users/current
pub async fn current_get(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

/// PATCH /api/users/current - change display name and/or password
pub async fn current_patch(
    State(state): State<AppState>,
    Extension(AuthUser(mut user)): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<User> {
    if let Some(name) = body.name {
        user.name = name;
    }
    if let Some(new_password) = body.password {
        user.password = password::hash_password(&new_password)?;
    }

    let updated = state.store.update_user(&user).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/users/logout - revoke the current token
pub async fn logout(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<bool> {
    auth::logout(state.store.as_ref(), &user).await?;

    if config::config().security.enable_audit_logging {
        tracing::info!("User {} logged out", user.id);
    }
    Ok(ApiResponse::success(true))
}

pub mod password;

use thiserror::Error;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::{DatabaseError, Store};

#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable session token. Deliberately carries no detail.
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed")]
    PasswordHash,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Resolve a raw `Authorization` header value to the user holding that token.
///
/// The value is opaque: an absent header, an empty one and one that matches
/// no user all fail the same way.
pub async fn authenticate(store: &dyn Store, header: Option<&str>) -> Result<User, AuthError> {
    let token = match header {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AuthError::Unauthorized),
    };

    store
        .find_user_by_token(token)
        .await?
        .ok_or(AuthError::Unauthorized)
}

/// Fresh opaque session token
pub fn issue_token() -> String {
    Uuid::new_v4().to_string()
}

/// Check credentials and rotate the user's token. An unknown username and a
/// wrong password are reported identically.
pub async fn login(store: &dyn Store, username: &str, password: &str) -> Result<User, AuthError> {
    let mut user = store
        .find_user_by_username(username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password::verify_password(password, &user.password) {
        return Err(AuthError::InvalidCredentials);
    }

    let token = issue_token();
    store.set_user_token(user.id, Some(&token)).await?;
    user.token = Some(token);
    Ok(user)
}

pub async fn logout(store: &dyn Store, user: &User) -> Result<(), AuthError> {
    store.set_user_token(user.id, None).await?;
    Ok(())
}

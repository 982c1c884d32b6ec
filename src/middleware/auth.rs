use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;

/// The user that authenticated the current request, handed to handlers
/// through request extensions
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Token authentication middleware: resolves the `Authorization` header to a
/// user or stops the request with 401
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = extract_token_from_headers(request.headers());

    let user = auth::authenticate(state.store.as_ref(), header).await.map_err(|e| {
        tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

/// Raw token from the `Authorization` header. There is no scheme prefix; a
/// value that is not visible ASCII is treated as absent.
fn extract_token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

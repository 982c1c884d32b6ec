use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::Store;
use crate::handlers;
use crate::middleware::token_auth_middleware;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/health", get(handlers::public::health))
        .merge(public_routes())
        // Everything else requires a session token
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config::config().api.max_request_size_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public;

    Router::new()
        .route("/api/users", post(public::register))
        .route("/api/users/login", post(public::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::delete;
    use handlers::protected::{addresses, contacts, users};

    Router::new()
        .route("/api/users/current", get(users::current_get).patch(users::current_patch))
        .route("/api/users/logout", delete(users::logout))
        .route("/api/contacts", get(contacts::search).post(contacts::create))
        .route(
            "/api/contacts/:id",
            get(contacts::get).patch(contacts::update).delete(contacts::delete),
        )
        .route(
            "/api/contacts/:contact_id/addresses",
            get(addresses::list).post(addresses::create),
        )
        .route(
            "/api/contacts/:contact_id/addresses/:address_id",
            get(addresses::get).put(addresses::update).delete(addresses::delete),
        )
        // route_layer: unknown paths stay 404 instead of 401
        .route_layer(middleware::from_fn_with_state(state, token_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

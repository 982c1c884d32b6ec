use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use contact_api::database::{DatabaseManager, InMemoryStore, PgStore, Store};
use contact_api::{app, config, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    let default_filter = if config.api.enable_request_logging {
        "contact_api=debug,tower_http=debug"
    } else {
        "contact_api=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    tracing::info!("Starting contact API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = if std::env::var("DATABASE_URL").is_ok() {
        let pool = DatabaseManager::connect().await.context("failed to connect to database")?;
        let store = PgStore::new(pool);
        store.ensure_schema().await.context("failed to prepare database schema")?;
        Arc::new(store)
    } else {
        if is_production!() {
            anyhow::bail!("DATABASE_URL must be set in production");
        }
        tracing::warn!("DATABASE_URL not set; using in-memory store, data will not persist");
        Arc::new(InMemoryStore::new())
    };

    let app = app(AppState::new(store));

    // Allow tests or deployments to override port via env
    let port = std::env::var("CONTACT_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Contact API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

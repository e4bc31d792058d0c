//! Lost & Found Backend
//!
//! Found-item listing board: reports, browsing, claims and a key-gated admin view,
//! with the whole item collection kept under a single SQLite key-value entry.

mod api;
mod auth;
mod browse;
mod config;
mod db;
mod errors;
mod models;
mod store;
mod workflow;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use store::ItemStore;

/// Application state shared across all handlers.
///
/// The store lock is held across mutate-and-save so no request sees
/// an unpersisted change.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ItemStore>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lost & Found Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Storage key: {}", config.storage_key);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.uses_default_admin_key() {
        tracing::warn!(
            "Admin view uses the built-in key (set LOSTFOUND_ADMIN_KEY). The admin key is a UI gate, not authentication!"
        );
    }

    let pool = db::init_database(&config.db_path).await?;
    let mut store = ItemStore::new(Repository::new(pool), config.storage_key.clone());
    store.load().await;

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_key = state.config.admin_key.clone();
    let max_body_bytes = state.config.max_body_bytes;

    let admin_routes = Router::new()
        .route("/items", get(api::list_admin_items))
        .route("/items/{id}", delete(api::remove_item))
        .route("/items/{id}/approve", post(api::approve_item))
        .route("/items/{id}/claim", post(api::mark_item_claimed))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_gate_layer(admin_key.clone(), req, next)
        }))
        // Unlock checks the key itself, so it stays outside the gate
        .route("/unlock", post(api::unlock_admin));

    let api_routes = Router::new()
        .route("/items", get(api::list_items).post(api::create_item))
        .route("/items/{id}", get(api::get_item))
        .route("/claims", post(api::submit_claim))
        .route("/stats", get(api::get_stats))
        .route("/revision", get(api::get_revision))
        .nest("/admin", admin_routes);

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;

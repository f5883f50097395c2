//! Listy Server - document collections with realtime listeners.
//!
//! Stores documents in SQLite, keyed by collection and document id, and
//! pushes the full collection snapshot to every WebSocket listener after each
//! committed write.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod websocket;

use crate::config::Config;
use crate::db::Pool;
use crate::websocket::ConnectionManager;
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub config: Arc<Config>,
    pub conn_manager: Arc<ConnectionManager>,
    /// Serializes writes with the snapshot fan-out that follows them.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pool: Pool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            conn_manager: ConnectionManager::new_shared(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open the configured database and bring its schema up to date.
    pub async fn connect(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = db::create_pool(&config.database_url).await?;
        db::run_migrations(&pool).await?;
        Ok(Self::new(pool, config))
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

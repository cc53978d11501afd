//! Questline API server entry point.

use std::sync::Arc;

use questline_api::config::{ServerConfig, load_game_config};
use questline_api::error::AppError;
use questline_api::state::AppState;
use questline_core::event::SystemClock;
use questline_registry::application::handle::RegistryHandle;
use questline_registry::application::persistence::SnapshotPersistence;
use questline_store::pg_key_value_store::PgKeyValueStore;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Questline API server");

    let config = ServerConfig::from_env()?;
    let game = load_game_config(&config.game_config)?;
    tracing::info!(
        path = %config.game_config.display(),
        locations = game.locations.len(),
        stations = game.station_count(),
        "loaded game configuration"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    let store = PgKeyValueStore::new(pool);
    store.ensure_schema().await?;

    // A malformed stored snapshot stops startup rather than resetting state.
    let persistence = SnapshotPersistence::new(Arc::new(store), config.state_key.clone());
    let registry = persistence.restore_or_init(&game).await?;
    let handle = RegistryHandle::spawn(registry, Arc::new(SystemClock), Some(persistence));

    let app = questline_api::app(AppState::new(handle))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

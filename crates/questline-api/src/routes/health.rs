//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Stations under management.
    pub stations: usize,
    /// Teams registered.
    pub teams: usize,
}

/// GET /health
///
/// Reports 503 once the registry worker has stopped.
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        stations: registry.station_count(),
        teams: registry.teams().len(),
    }))
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

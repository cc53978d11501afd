//! Routes for station caretakers.
//!
//! Every endpoint acts on the caller's own station.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    Json, Router,
    routing::{get, post},
};
use questline_core::error::DomainError;
use questline_registry::application::command_handlers::Release;
use questline_registry::application::query_handlers::{self, StationView};
use questline_registry::domain::commands;
use questline_registry::domain::outcomes::{Acceptance, Routing};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::caller::Caretaker;
use crate::error::{ApiError, ErrorBody};
use crate::routes::response::CommandResponse;
use crate::state::AppState;

/// Response body for POST /release.
///
/// A blocked release also carries the `blocked` error code; the handoff has
/// begun and stays pending until POST /route succeeds.
#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    /// The handled command.
    #[serde(flatten)]
    pub response: CommandResponse<Release>,
    /// Present when routing found no free station.
    #[serde(flatten)]
    pub blocked: Option<ErrorBody>,
}

/// POST /accept
#[instrument(skip(state, caretaker), fields(station = %caretaker.station, caretaker = %caretaker.identity.as_str()))]
async fn accept(
    State(state): State<AppState>,
    caretaker: Caretaker,
) -> Result<Json<CommandResponse<Acceptance>>, ApiError> {
    let command = commands::AcceptArrival {
        correlation_id: Uuid::new_v4(),
        station: caretaker.station,
    };

    info!(correlation_id = %command.correlation_id, "handling accept_arrival command");

    let handled = state.handle.accept_arrival(command).await?;
    Ok(Json(handled.into()))
}

/// POST /release
#[instrument(skip(state, caretaker), fields(station = %caretaker.station, caretaker = %caretaker.identity.as_str()))]
async fn release(
    State(state): State<AppState>,
    caretaker: Caretaker,
) -> Result<Response, ApiError> {
    let command = commands::BeginHandoff {
        correlation_id: Uuid::new_v4(),
        station: caretaker.station,
    };

    info!(correlation_id = %command.correlation_id, "handling release command");

    let handled = state.handle.release(command).await?;
    let blocked = match &handled.value {
        Release::Blocked { team, station } => Some(ErrorBody::for_domain(&DomainError::Blocked {
            team: team.clone(),
            station: station.to_string(),
        })),
        Release::QuestComplete { .. } | Release::Routed(_) => None,
    };
    let status = if blocked.is_some() {
        StatusCode::LOCKED
    } else {
        StatusCode::OK
    };

    let body = ReleaseResponse {
        response: handled.into(),
        blocked,
    };
    Ok((status, Json(body)).into_response())
}

/// POST /route
#[instrument(skip(state, caretaker), fields(station = %caretaker.station, caretaker = %caretaker.identity.as_str()))]
async fn route(
    State(state): State<AppState>,
    caretaker: Caretaker,
) -> Result<Json<CommandResponse<Routing>>, ApiError> {
    let command = commands::ResolveHandoff {
        correlation_id: Uuid::new_v4(),
        station: caretaker.station,
    };

    info!(correlation_id = %command.correlation_id, "handling resolve_handoff command");

    let handled = state.handle.resolve_handoff(command).await?;
    Ok(Json(handled.into()))
}

/// GET /station
async fn station(
    State(state): State<AppState>,
    caretaker: Caretaker,
) -> Result<Json<StationView>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::get_station(
        &registry,
        &caretaker.station,
    )?))
}

/// Returns the router for caretaker endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accept", post(accept))
        .route("/release", post(release))
        .route("/route", post(route))
        .route("/station", get(station))
}

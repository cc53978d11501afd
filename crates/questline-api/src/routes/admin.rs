//! Routes for admins: registration, overrides and registry-wide views.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use questline_registry::application::query_handlers::{
    self, LocationView, RegistrationCapacity, StationView, TeamView,
};
use questline_registry::domain::commands;
use questline_registry::domain::ids::StationId;
use questline_registry::domain::outcomes::{
    Assignment, EditAction, ForcedAssignment, StatusChange, ToVisitEdit, TouchedStation,
};
use questline_registry::domain::station::Occupancy;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::caller::Admin;
use crate::error::ApiError;
use crate::routes::response::CommandResponse;
use crate::state::AppState;

/// Request body for POST /teams.
#[derive(Debug, Deserialize)]
pub struct RegisterTeamRequest {
    /// Team name; surrounding whitespace is ignored.
    pub name: String,
}

/// Request body for POST /teams/{team}/to-visit.
#[derive(Debug, Deserialize)]
pub struct EditToVisitRequest {
    /// Location to add or remove.
    pub location: String,
    /// `add` or `remove`.
    pub action: EditAction,
}

/// Request body for POST /teams/{team}/assign.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// Target station id, e.g. `Plov-Center-2`.
    pub station: String,
}

/// Request body for POST /stations/{station}/status.
#[derive(Debug, Deserialize)]
pub struct ForceStatusRequest {
    /// `Free`, `Waiting` or `In progress`.
    pub occupancy: Occupancy,
}

/// Result of POST /reset-all.
#[derive(Debug, Serialize)]
pub struct ResetAllResult {
    /// Stations that had a team before the reset.
    pub touched: Vec<TouchedStation>,
}

fn parse_station(raw: &str) -> Result<StationId, ApiError> {
    Ok(raw.parse::<StationId>()?)
}

/// POST /teams
#[instrument(skip(state, admin, request), fields(admin = %admin.0.as_str(), team = %request.name))]
async fn register_team(
    State(state): State<AppState>,
    admin: Admin,
    Json(request): Json<RegisterTeamRequest>,
) -> Result<Json<CommandResponse<Assignment>>, ApiError> {
    let command = commands::RegisterTeam {
        correlation_id: Uuid::new_v4(),
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling register_team command");

    let handled = state.handle.register_team(command).await?;
    Ok(Json(handled.into()))
}

/// GET /teams
async fn list_teams(
    State(state): State<AppState>,
    _admin: Admin,
) -> Result<Json<Vec<TeamView>>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::teams_snapshot(&registry)))
}

/// GET /teams/unassigned
async fn unassigned_teams(
    State(state): State<AppState>,
    _admin: Admin,
) -> Result<Json<Vec<TeamView>>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::unassigned_teams(&registry)))
}

/// GET /teams/{team}
async fn get_team(
    State(state): State<AppState>,
    _admin: Admin,
    Path(team): Path<String>,
) -> Result<Json<TeamView>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::get_team(&registry, &team)?))
}

/// GET /teams/{team}/to-visit
async fn team_to_visit(
    State(state): State<AppState>,
    _admin: Admin,
    Path(team): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::team_to_visit(&registry, &team)?))
}

/// POST /teams/{team}/to-visit
#[instrument(skip(state, admin, request), fields(admin = %admin.0.as_str(), team = %team))]
async fn edit_to_visit(
    State(state): State<AppState>,
    admin: Admin,
    Path(team): Path<String>,
    Json(request): Json<EditToVisitRequest>,
) -> Result<Json<CommandResponse<ToVisitEdit>>, ApiError> {
    let command = commands::EditToVisit {
        correlation_id: Uuid::new_v4(),
        team,
        location: request.location,
        action: request.action,
    };

    info!(correlation_id = %command.correlation_id, "handling edit_to_visit command");

    let handled = state.handle.edit_to_visit(command).await?;
    Ok(Json(handled.into()))
}

/// POST /teams/{team}/assign
#[instrument(skip(state, admin, request), fields(admin = %admin.0.as_str(), team = %team))]
async fn force_assign(
    State(state): State<AppState>,
    admin: Admin,
    Path(team): Path<String>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<CommandResponse<ForcedAssignment>>, ApiError> {
    let command = commands::ForceAssign {
        correlation_id: Uuid::new_v4(),
        team,
        station: parse_station(&request.station)?,
    };

    info!(correlation_id = %command.correlation_id, station = %command.station, "handling force_assign command");

    let handled = state.handle.force_assign(command).await?;
    Ok(Json(handled.into()))
}

/// GET /stations
async fn list_stations(
    State(state): State<AppState>,
    _admin: Admin,
) -> Result<Json<Vec<LocationView>>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::stations_by_location(&registry)))
}

/// GET /stations/{station}
async fn get_station(
    State(state): State<AppState>,
    _admin: Admin,
    Path(station): Path<String>,
) -> Result<Json<StationView>, ApiError> {
    let station = parse_station(&station)?;
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::get_station(&registry, &station)?))
}

/// POST /stations/{station}/status
#[instrument(skip(state, admin, request), fields(admin = %admin.0.as_str(), station = %station))]
async fn force_status(
    State(state): State<AppState>,
    admin: Admin,
    Path(station): Path<String>,
    Json(request): Json<ForceStatusRequest>,
) -> Result<Json<CommandResponse<StatusChange>>, ApiError> {
    let command = commands::ForceStatus {
        correlation_id: Uuid::new_v4(),
        station: parse_station(&station)?,
        occupancy: request.occupancy,
    };

    info!(correlation_id = %command.correlation_id, "handling force_status command");

    let handled = state.handle.force_status(command).await?;
    Ok(Json(handled.into()))
}

/// POST /stations/{station}/reset
#[instrument(skip(state, admin), fields(admin = %admin.0.as_str(), station = %station))]
async fn reset_station(
    State(state): State<AppState>,
    admin: Admin,
    Path(station): Path<String>,
) -> Result<Json<CommandResponse<TouchedStation>>, ApiError> {
    let command = commands::ResetStation {
        correlation_id: Uuid::new_v4(),
        station: parse_station(&station)?,
    };

    info!(correlation_id = %command.correlation_id, "handling reset_station command");

    let handled = state.handle.reset_station(command).await?;
    Ok(Json(handled.into()))
}

/// POST /reset-all
#[instrument(skip(state, admin), fields(admin = %admin.0.as_str()))]
async fn reset_all(
    State(state): State<AppState>,
    admin: Admin,
) -> Result<Json<CommandResponse<ResetAllResult>>, ApiError> {
    let command = commands::ResetAll {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling reset_all command");

    let handled = state.handle.reset_all(command).await?;
    let response = CommandResponse {
        event_ids: handled.event_ids(),
        notifications: handled.notifications,
        persisted: handled.persisted,
        result: ResetAllResult {
            touched: handled.value,
        },
    };
    Ok(Json(response))
}

/// GET /capacity
async fn capacity(
    State(state): State<AppState>,
    _admin: Admin,
) -> Result<Json<RegistrationCapacity>, ApiError> {
    let registry = state.handle.query().await?;
    Ok(Json(query_handlers::registration_capacity(&registry)))
}

/// Returns the router for admin endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams", post(register_team).get(list_teams))
        .route("/teams/unassigned", get(unassigned_teams))
        .route("/teams/{team}", get(get_team))
        .route("/teams/{team}/to-visit", get(team_to_visit).post(edit_to_visit))
        .route("/teams/{team}/assign", post(force_assign))
        .route("/stations", get(list_stations))
        .route("/stations/{station}", get(get_station))
        .route("/stations/{station}/status", post(force_status))
        .route("/stations/{station}/reset", post(reset_station))
        .route("/reset-all", post(reset_all))
        .route("/capacity", get(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use questline_registry::application::handle::RegistryHandle;
    use questline_registry::domain::registry::Registry;
    use questline_test_support::{FixedClock, two_location_config};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::caller::IDENTITY_HEADER;

    fn test_app_state() -> AppState {
        let registry = Registry::from_config(&two_location_config()).unwrap();
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()));
        AppState::new(RegistryHandle::spawn(registry, clock, None))
    }

    fn request(identity: &str, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(IDENTITY_HEADER, identity);
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_of(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_team_returns_assignment_and_notification() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "name": "  Owls " });

        // Act
        let response = app
            .oneshot(request("admin", "POST", "/teams", Some(body)))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["team"], "Owls");
        assert_eq!(json["station"], "A-1");
        assert_eq!(json["notifications"][0]["recipient"], "care-a1");
        assert_eq!(json["notifications"][0]["kind"], "team_incoming");
        assert_eq!(json["event_ids"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_caretaker_cannot_register_teams() {
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "name": "Owls" });

        let response = app
            .oneshot(request("care-a1", "POST", "/teams", Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_of(response).await["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_register_team_returns_422_for_missing_name() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(request("admin", "POST", "/teams", Some(serde_json::json!({}))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_station_id_returns_400() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(request("admin", "POST", "/stations/nowhere/reset", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "invalid_station_id");
    }

    #[tokio::test]
    async fn test_unknown_team_returns_404() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(request("admin", "GET", "/teams/ghost", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_of(response).await["error"], "unknown_team");
    }

    #[tokio::test]
    async fn test_unassigned_is_not_read_as_a_team_name() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(request("admin", "GET", "/teams/unassigned", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await, serde_json::json!([]));
    }
}

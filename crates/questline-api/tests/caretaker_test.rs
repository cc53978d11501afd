//! Integration tests for the caretaker handoff flow.

mod common;

use axum::http::StatusCode;
use common::{CARE_A1, CARE_B1};

#[tokio::test]
async fn test_team_is_routed_then_completes_its_quest() {
    // Arrange
    let (app, store) = common::build_test_app();
    assert_eq!(common::register(&app, "Owls").await, "A-1");

    // Act
    let (accept_status, _) = common::post_json(&app, CARE_A1, "/api/v1/caretaker/accept", None).await;
    let (release_status, routed) =
        common::post_json(&app, CARE_A1, "/api/v1/caretaker/release", None).await;
    common::post_json(&app, CARE_B1, "/api/v1/caretaker/accept", None).await;
    let (_, finished) = common::post_json(&app, CARE_B1, "/api/v1/caretaker/release", None).await;

    // Assert
    assert_eq!(accept_status, StatusCode::OK);
    assert_eq!(release_status, StatusCode::OK);
    assert_eq!(routed["outcome"], "routed");
    assert_eq!(routed["from"], "A-1");
    assert_eq!(routed["visited_location"], "A");
    assert_eq!(routed["assignment"]["station"], "B-1");
    assert_eq!(routed["notifications"][0]["recipient"], CARE_B1);
    assert_eq!(routed["notifications"][0]["kind"], "team_incoming");
    assert_eq!(routed["event_ids"].as_array().unwrap().len(), 2);
    assert_eq!(routed["persisted"], true);
    assert_eq!(finished["outcome"], "quest_complete");

    let (_, team) = common::get_json(&app, common::ADMIN, "/api/v1/admin/teams/Owls").await;
    assert_eq!(team["whereabouts"]["state"], "complete");
    assert_eq!(team["visited"], serde_json::json!(["A", "B"]));
    assert_eq!(store.writes().len(), 5);
}

#[tokio::test]
async fn test_blocked_release_returns_423_and_route_retries() {
    // Arrange: both stations busy.
    let (app, _store) = common::build_test_app();
    common::register(&app, "Owls").await;
    common::register(&app, "Bats").await;
    common::post_json(&app, CARE_A1, "/api/v1/caretaker/accept", None).await;
    common::post_json(&app, CARE_B1, "/api/v1/caretaker/accept", None).await;

    // Act
    let (status, blocked) = common::post_json(&app, CARE_A1, "/api/v1/caretaker/release", None).await;
    let (retry_status, retry) =
        common::post_json(&app, CARE_A1, "/api/v1/caretaker/route", None).await;

    // Assert
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(blocked["outcome"], "blocked");
    assert_eq!(blocked["error"], "blocked");
    assert_eq!(blocked["retryable"], true);
    assert_eq!(blocked["event_ids"].as_array().unwrap().len(), 1);
    assert_eq!(retry_status, StatusCode::LOCKED);
    assert_eq!(retry["error"], "blocked");

    // Act: Bats leave B-1 for the freed A-1, then the Owls' retry succeeds.
    let (_, bats) = common::post_json(&app, CARE_B1, "/api/v1/caretaker/release", None).await;
    let (owls_status, owls) = common::post_json(&app, CARE_A1, "/api/v1/caretaker/route", None).await;

    // Assert
    assert_eq!(bats["assignment"]["station"], "A-1");
    assert_eq!(owls_status, StatusCode::OK);
    assert_eq!(owls["assignment"]["station"], "B-1");
}

#[tokio::test]
async fn test_second_release_while_handoff_pending_returns_409() {
    // Arrange
    let (app, _store) = common::build_test_app();
    common::register(&app, "Owls").await;
    common::register(&app, "Bats").await;
    common::post_json(&app, CARE_A1, "/api/v1/caretaker/accept", None).await;
    common::post_json(&app, CARE_B1, "/api/v1/caretaker/accept", None).await;
    common::post_json(&app, CARE_A1, "/api/v1/caretaker/release", None).await;

    // Act
    let (status, json) = common::post_json(&app, CARE_A1, "/api/v1/caretaker/release", None).await;

    // Assert
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "handoff_pending");
}

#[tokio::test]
async fn test_caretaker_station_view_shows_departing_team() {
    // Arrange
    let (app, _store) = common::build_test_app();
    common::register(&app, "Owls").await;
    common::register(&app, "Bats").await;
    common::post_json(&app, CARE_A1, "/api/v1/caretaker/accept", None).await;
    common::post_json(&app, CARE_B1, "/api/v1/caretaker/accept", None).await;
    common::post_json(&app, CARE_A1, "/api/v1/caretaker/release", None).await;

    // Act
    let (status, json) = common::get_json(&app, CARE_A1, "/api/v1/caretaker/station").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["station"], "A-1");
    assert_eq!(json["occupancy"], "Free");
    assert_eq!(json["current_team"], serde_json::Value::Null);
    assert_eq!(json["departing_team"], "Owls");
    assert_eq!(json["caretakers"], serde_json::json!([CARE_A1, null]));
}

#[tokio::test]
async fn test_stranger_is_forbidden() {
    let (app, _store) = common::build_test_app();

    let (status, json) = common::post_json(&app, "stranger", "/api/v1/caretaker/accept", None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}

//! Integration tests for the health and whoami endpoints.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_returns_200_with_registry_counts() {
    let (app, _store) = common::build_test_app();

    let (status, json) = common::get_json(&app, "anyone", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["stations"], 2);
    assert_eq!(json["teams"], 0);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (app, _store) = common::build_test_app();

    let (status, _) = common::get_json(&app, common::ADMIN, "/api/v1/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_whoami_resolves_each_role() {
    let (app, _store) = common::build_test_app();

    let (_, admin) = common::get_json(&app, common::ADMIN, "/api/v1/whoami").await;
    let (_, caretaker) = common::get_json(&app, common::CARE_B1, "/api/v1/whoami").await;
    let (_, stranger) = common::get_json(&app, "stranger", "/api/v1/whoami").await;

    assert_eq!(admin, serde_json::json!({ "identity": "admin", "role": "admin" }));
    assert_eq!(
        caretaker,
        serde_json::json!({ "identity": "care-b1", "role": "caretaker", "station": "B-1" })
    );
    assert_eq!(stranger["role"], "unknown");
}

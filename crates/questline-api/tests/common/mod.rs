//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use questline_core::event::Clock;
use questline_registry::application::handle::RegistryHandle;
use questline_registry::application::persistence::SnapshotPersistence;
use questline_registry::domain::config::GameConfig;
use questline_registry::domain::registry::Registry;
use questline_test_support::{FixedClock, InMemoryKeyValueStore, two_location_config};
use tower::ServiceExt;

use questline_api::caller::IDENTITY_HEADER;
use questline_api::state::AppState;

pub const ADMIN: &str = "admin";
pub const CARE_A1: &str = "care-a1";
pub const CARE_B1: &str = "care-b1";
pub const STATE_KEY: &str = "questline:test";

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over the two-location game, saving snapshots to
/// the returned in-memory store. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> (Router, Arc<InMemoryKeyValueStore>) {
    let config: GameConfig = two_location_config();
    let registry = Registry::from_config(&config).unwrap();
    let store = Arc::new(InMemoryKeyValueStore::new());
    let persistence = SnapshotPersistence::new(store.clone(), STATE_KEY);
    let handle = RegistryHandle::spawn(registry, fixed_clock(), Some(persistence));

    (questline_api::app(AppState::new(handle)), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request as `identity` with an optional JSON body.
pub async fn post_json(
    app: &Router,
    identity: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(IDENTITY_HEADER, identity);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send(app, request).await
}

/// Send a GET request as `identity`.
pub async fn get_json(app: &Router, identity: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(IDENTITY_HEADER, identity)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Register a team as the admin and return the station it was sent to.
pub async fn register(app: &Router, name: &str) -> String {
    let (status, json) = post_json(
        app,
        ADMIN,
        "/api/v1/admin/teams",
        Some(&serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {name}: {json}");
    json["station"].as_str().unwrap().to_owned()
}

//! Questline HTTP API.
//!
//! Resolves the caller's identity to a role once per request, issues one
//! registry operation through the worker handle and renders the outcome,
//! caretaker notifications included, as JSON.

use axum::Router;

pub mod caller;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the full application router. Middleware layers are added by the
/// binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::whoami::router())
        .nest("/api/v1/caretaker", routes::caretaker::router())
        .nest("/api/v1/admin", routes::admin::router())
        .with_state(state)
}

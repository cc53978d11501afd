//! Caller self-inspection.

use axum::{Json, Router, routing::get};
use questline_core::identity::Identity;
use questline_registry::domain::roles::Role;
use serde::Serialize;

use crate::caller::Caller;
use crate::state::AppState;

/// Response body for GET /whoami.
#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    /// The identity from the request header.
    pub identity: Identity,
    /// The role it resolves to.
    #[serde(flatten)]
    pub role: Role,
}

/// GET /whoami
async fn whoami(caller: Caller) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        identity: caller.identity,
        role: caller.role,
    })
}

/// Returns the router for caller self-inspection.
pub fn router() -> Router<AppState> {
    Router::new().route("/whoami", get(whoami))
}

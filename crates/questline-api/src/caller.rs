//! Caller identity and role extraction.
//!
//! The identity comes from the `x-questline-identity` header and is resolved
//! to a [`Role`] once per request through the registry worker.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use questline_core::identity::Identity;
use questline_registry::domain::ids::StationId;
use questline_registry::domain::roles::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's identity.
pub const IDENTITY_HEADER: &str = "x-questline-identity";

/// Any identified caller.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Who is calling.
    pub identity: Identity,
    /// What they may do.
    pub role: Role,
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Identity::new)
            .ok_or(ApiError::MissingIdentity)?;
        let role = state.handle.role_of(identity.clone()).await?;
        Ok(Self { identity, role })
    }
}

/// A caller with the admin role.
#[derive(Debug, Clone)]
pub struct Admin(pub Identity);

impl FromRequestParts<AppState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        match caller.role {
            Role::Admin => Ok(Self(caller.identity)),
            _ => Err(ApiError::Forbidden("admin")),
        }
    }
}

/// A caller caretaking one station.
#[derive(Debug, Clone)]
pub struct Caretaker {
    /// Who is calling.
    pub identity: Identity,
    /// The station they look after.
    pub station: StationId,
}

impl FromRequestParts<AppState> for Caretaker {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        match caller.role {
            Role::Caretaker(station) => Ok(Self {
                identity: caller.identity,
                station,
            }),
            _ => Err(ApiError::Forbidden("caretaker")),
        }
    }
}

//! Questline API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use questline_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable or the game configuration is missing
    /// or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// The stored registry could not be restored.
    #[error("failed to restore registry: {0}")]
    Load(#[from] DomainError),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Set when the same request may succeed later unchanged.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ErrorBody {
    /// Body describing a domain error.
    #[must_use]
    pub fn for_domain(err: &DomainError) -> Self {
        Self {
            error: err.code(),
            message: err.to_string(),
            retryable: err.is_blocked(),
        }
    }
}

/// HTTP-layer error: a domain error or a failed caller check.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A registry operation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The request carried no caller identity.
    #[error("missing x-questline-identity header")]
    MissingIdentity,

    /// The caller's role does not allow this endpoint.
    #[error("this endpoint requires the {0} role")]
    Forbidden(&'static str),
}

/// Status code for a domain error.
#[must_use]
pub fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::UnknownStation(_)
        | DomainError::UnknownTeam(_)
        | DomainError::UnknownLocation(_) => StatusCode::NOT_FOUND,
        DomainError::DuplicateTeam(_)
        | DomainError::CapacityExceeded { .. }
        | DomainError::NoCapacity
        | DomainError::NothingToAccept(_)
        | DomainError::AlreadyWorking(_)
        | DomainError::HandoffPending { .. }
        | DomainError::NotWorking(_)
        | DomainError::NoHandoffPending(_) => StatusCode::CONFLICT,
        DomainError::Blocked { .. } => StatusCode::LOCKED,
        DomainError::InvalidStationId(_)
        | DomainError::InvalidTeamName(_)
        | DomainError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        DomainError::LoadFailure(_)
        | DomainError::SaveFailure(_)
        | DomainError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::RegistryUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Domain(err) => (domain_status(err), ErrorBody::for_domain(err)),
            Self::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "missing_identity",
                    message: self.to_string(),
                    retryable: false,
                },
            ),
            Self::Forbidden(_) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: "forbidden",
                    message: self.to_string(),
                    retryable: false,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

//! Application-wide error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forecast_workflow::{ProfileError, RejectionReason};
use thiserror::Error;

use crate::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Rejected(#[from] RejectionReason),

    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    #[error("Project {0} not found")]
    NotFound(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Location {0:?} is not in any supported state")]
    UnknownLocation(String),

    #[error("Forecast service error: {0}")]
    Forecast(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected(RejectionReason::InvalidTransition { .. }) => StatusCode::CONFLICT,
            Self::Rejected(_) => StatusCode::FORBIDDEN,
            Self::UnknownActor(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Profile(_) | Self::Validation(_) | Self::UnknownLocation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Forecast(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_)
            | Self::Migrate(_)
            | Self::Json(_)
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

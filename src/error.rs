use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::dates::DayKey;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no goal set for user {user_id} on {day}")]
    NotFound { user_id: Uuid, day: DayKey },

    #[error("unknown food item {0}")]
    UnknownFood(Uuid),

    #[error("goal upsert could not be resolved: {0}")]
    ConflictUnresolved(#[source] BoxError),

    #[error("storage error: {0}")]
    Storage(#[source] BoxError),
}

impl TrackerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn storage(e: impl Into<BoxError>) -> Self {
        Self::Storage(e.into())
    }

    pub fn conflict(e: impl Into<BoxError>) -> Self {
        Self::ConflictUnresolved(e.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::UnknownFood(_) => StatusCode::NOT_FOUND,
            Self::ConflictUnresolved(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::ConflictUnresolved(e) => tracing::error!(error = %e, "goal upsert failed"),
            Self::Storage(e) => tracing::error!(error = %e, "storage failure"),
            _ => tracing::debug!(error = %self, %status, "request rejected"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

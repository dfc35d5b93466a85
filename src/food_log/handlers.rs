use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::dto::LogFoodRequest;
use super::repo_types::LoggedItem;
use super::services;
use crate::{dates::canonical_day, error::TrackerError, state::AppState};

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/log", post(log_food))
        .route("/users/:user_id/log/:day", get(list_day))
}

#[instrument(skip(state))]
pub async fn log_food(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<LogFoodRequest>,
) -> Result<(StatusCode, Json<LoggedItem>), TrackerError> {
    let item = services::log_food(&state, user_id, payload, OffsetDateTime::now_utc()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state))]
pub async fn list_day(
    State(state): State<AppState>,
    Path((user_id, day)): Path<(Uuid, String)>,
) -> Result<Json<Vec<LoggedItem>>, TrackerError> {
    let day = canonical_day(day)?;
    let items = services::items_for_day(&state, user_id, day).await?;
    Ok(Json(items))
}

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{DailySummary, HistoryQuery, HistoryReport, StreakReport};
use super::services::{self, DEFAULT_HISTORY_DAYS};
use crate::{dates::canonical_day, error::TrackerError, state::AppState};

pub fn summary_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/summary/:day", get(get_summary))
        .route("/users/:user_id/history", get(get_history))
        .route("/users/:user_id/streak", get(get_streak))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Path((user_id, day)): Path<(Uuid, String)>,
) -> Result<Json<DailySummary>, TrackerError> {
    let day = canonical_day(day)?;
    Ok(Json(services::daily_summary(&state, user_id, day).await?))
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryReport>, TrackerError> {
    let days = q.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let report = services::history(&state, user_id, days, OffsetDateTime::now_utc()).await?;
    Ok(Json(report))
}

#[instrument(skip(state))]
pub async fn get_streak(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<StreakReport>, TrackerError> {
    Ok(Json(
        services::streak(&state, user_id, OffsetDateTime::now_utc()).await?,
    ))
}

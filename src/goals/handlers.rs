use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::GoalRequest;
use super::repo_types::MacroGoal;
use crate::{
    dates::canonical_day,
    error::TrackerError,
    nutrition::{CalorieSplit, MacroTargets},
    state::AppState,
};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/goals/:day", get(get_goal).put(put_goal))
        .route("/users/:user_id/goals/:day/split", post(put_goal_split))
}

#[instrument(skip(state))]
pub async fn get_goal(
    State(state): State<AppState>,
    Path((user_id, day)): Path<(Uuid, String)>,
) -> Result<Json<MacroGoal>, TrackerError> {
    let day = canonical_day(day)?;
    let goal = state.goals.require(user_id, day).await?;
    Ok(Json(goal))
}

#[instrument(skip(state, payload))]
pub async fn put_goal(
    State(state): State<AppState>,
    Path((user_id, day)): Path<(Uuid, String)>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<MacroGoal>, TrackerError> {
    let day = canonical_day(day)?;
    let targets = MacroTargets::try_from(payload)?;
    let goal = state.goals.set(user_id, day, targets).await?;
    Ok(Json(goal))
}

/// Goal from a calorie budget and a protein/carbs/fat percentage split.
#[instrument(skip(state))]
pub async fn put_goal_split(
    State(state): State<AppState>,
    Path((user_id, day)): Path<(Uuid, String)>,
    Json(split): Json<CalorieSplit>,
) -> Result<Json<MacroGoal>, TrackerError> {
    let day = canonical_day(day)?;
    let targets = split.into_targets()?;
    let goal = state.goals.set(user_id, day, targets).await?;
    Ok(Json(goal))
}

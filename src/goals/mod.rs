mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::PgGoalStorage;
pub use services::GoalStore;

pub fn router() -> Router<AppState> {
    handlers::goal_routes()
}

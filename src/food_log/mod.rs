mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{FoodCatalog, FoodLog, PgFoodCatalog, PgFoodLog};

pub fn router() -> Router<AppState> {
    handlers::log_routes()
}

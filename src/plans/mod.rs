pub mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/households/:id/plans", get(handlers::plan_history))
        .route(
            "/households/:id/plans/:week",
            get(handlers::get_plan_for_week).put(handlers::save_plan_for_week),
        )
        .route("/plans/:id", delete(handlers::delete_plan))
}

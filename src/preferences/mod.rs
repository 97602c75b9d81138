pub mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/households/:id/preferences",
            get(handlers::list_preferences).put(handlers::add_preference),
        )
        .route(
            "/households/:id/preferences/toggle",
            post(handlers::toggle_preference),
        )
        .route("/preferences/:id", delete(handlers::remove_preference))
}

pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(handlers::get_me).patch(handlers::update_me),
        )
        .route("/me/active-household", put(handlers::switch_household))
}

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
            "/households",
            get(handlers::list_households).post(handlers::create_household),
        )
        .route(
            "/households/:id",
            get(handlers::get_household).patch(handlers::update_household),
        )
        .route("/households/:id/members", get(handlers::list_members))
        .route(
            "/households/:id/members/:user_id",
            delete(handlers::remove_member),
        )
        .route(
            "/households/:id/invitations",
            get(handlers::list_household_invitations).post(handlers::create_invitation),
        )
        .route("/invitations/pending", get(handlers::pending_invitations))
        .route(
            "/invitations/:id/accept",
            post(handlers::accept_invitation),
        )
        .route(
            "/invitations/:id/decline",
            post(handlers::decline_invitation),
        )
        .route("/invitations/:id", delete(handlers::cancel_invitation))
}

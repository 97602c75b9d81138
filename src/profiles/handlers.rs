use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::AppError;
use crate::households::{self, repo::Household};
use crate::state::AppState;

use super::repo::{self, Profile};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub profile: Profile,
    pub active_household: Option<Household>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchHouseholdRequest {
    pub household_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// GET /me — the caller's profile plus their resolved active household.
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let profile = repo::find(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;

    let active_household = match profile.active_household_id {
        Some(household_id) => households::repo::find(&state.db, household_id).await?,
        None => None,
    };

    Ok(Json(MeResponse {
        profile,
        active_household,
    }))
}

/// PUT /me/active-household — scopes the caller's session to one of their
/// households.
#[instrument(skip(state, body))]
pub async fn switch_household(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SwitchHouseholdRequest>,
) -> Result<Json<Profile>, AppError> {
    households::repo::require_member(&state.db, body.household_id, user_id).await?;
    repo::set_active_household(&state.db, user_id, body.household_id).await?;
    let profile = repo::find(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;
    info!(user_id = %user_id, household_id = %body.household_id, "active household switched");
    Ok(Json(profile))
}

#[instrument(skip(state, body))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    if matches!(body.display_name.as_deref(), Some(n) if n.trim().is_empty()) {
        return Err(AppError::validation("display_name must not be empty"));
    }
    let profile = repo::update(
        &state.db,
        user_id,
        body.display_name.as_deref().map(str::trim),
        body.avatar_url.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Profile not found"))?;
    Ok(Json(profile))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::AppError;
use crate::households;
use crate::state::AppState;

use super::dto::PreferenceRequest;
use super::repo::{self, MealPreference};

#[instrument(skip(state))]
pub async fn list_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
) -> Result<Json<Vec<MealPreference>>, AppError> {
    households::repo::require_member(&state.db, household_id, user_id).await?;
    let rows = repo::list_for_household(&state.db, household_id).await?;
    Ok(Json(rows))
}

/// PUT /households/:id/preferences — plain upsert; the conflict target
/// overwrites preference and created_by.
#[instrument(skip(state, body))]
pub async fn add_preference(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
    Json(body): Json<PreferenceRequest>,
) -> Result<Json<MealPreference>, AppError> {
    households::repo::require_member(&state.db, household_id, user_id).await?;
    let description = body.meal_description.trim();
    if description.is_empty() {
        return Err(AppError::validation("meal_description is required"));
    }
    let row = repo::upsert(
        &state.db,
        household_id,
        body.meal_type.as_str(),
        description,
        body.preference.as_str(),
        user_id,
    )
    .await?;
    Ok(Json(row))
}

/// POST /households/:id/preferences/toggle — recording the same preference
/// twice removes it (un-like / un-dislike); the opposite one overwrites.
/// Returns the surviving row, or `null` after a removal.
#[instrument(skip(state, body))]
pub async fn toggle_preference(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
    Json(body): Json<PreferenceRequest>,
) -> Result<Json<Option<MealPreference>>, AppError> {
    households::repo::require_member(&state.db, household_id, user_id).await?;
    let description = body.meal_description.trim();
    if description.is_empty() {
        return Err(AppError::validation("meal_description is required"));
    }

    let existing = repo::find_by_triple(
        &state.db,
        household_id,
        body.meal_type.as_str(),
        description,
    )
    .await?;

    if let Some(existing) = existing {
        if existing.preference == body.preference.as_str() {
            repo::delete(&state.db, existing.id).await?;
            info!(household_id = %household_id, meal = description, "preference cleared");
            return Ok(Json(None));
        }
    }

    let row = repo::upsert(
        &state.db,
        household_id,
        body.meal_type.as_str(),
        description,
        body.preference.as_str(),
        user_id,
    )
    .await?;
    Ok(Json(Some(row)))
}

#[instrument(skip(state))]
pub async fn remove_preference(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let preference = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Meal preference not found"))?;
    households::repo::require_member(&state.db, preference.household_id, user_id).await?;
    repo::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

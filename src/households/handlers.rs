use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::{self, jwt::AuthUser};
use crate::error::AppError;
use crate::profiles;
use crate::state::AppState;

use super::dto::{CreateHouseholdRequest, CreateInvitationRequest, UpdateHouseholdRequest};
use super::repo::{self, Household, HouseholdInvitation, MemberWithProfile};

const DEFAULT_FAMILY_SIZE: i32 = 4;
const DEFAULT_WEEKLY_BUDGET: f64 = 300.0;

fn validate_envelope(family_size: Option<i32>, weekly_budget: Option<f64>) -> Result<(), AppError> {
    if matches!(family_size, Some(n) if n < 1) {
        return Err(AppError::validation("family_size must be at least 1"));
    }
    if matches!(weekly_budget, Some(b) if b < 0.0) {
        return Err(AppError::validation("weekly_budget must not be negative"));
    }
    Ok(())
}

/// POST /households — creates the household, the creator's owner membership
/// and their active-household pointer in one transaction.
#[instrument(skip(state, body))]
pub async fn create_household(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateHouseholdRequest>,
) -> Result<(StatusCode, Json<Household>), AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Household name is required"));
    }
    validate_envelope(body.family_size, body.weekly_budget)?;

    let household = repo::create_with_owner(
        &state.db,
        name,
        body.family_size.unwrap_or(DEFAULT_FAMILY_SIZE),
        body.weekly_budget.unwrap_or(DEFAULT_WEEKLY_BUDGET),
        user_id,
    )
    .await?;

    info!(household_id = %household.id, owner = %user_id, "household created");
    Ok((StatusCode::CREATED, Json(household)))
}

/// PATCH /households/:id — partial update. Any member may edit the name,
/// size and budget; only member removal is owner-gated.
#[instrument(skip(state, body))]
pub async fn update_household(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
    Json(body): Json<UpdateHouseholdRequest>,
) -> Result<Json<Household>, AppError> {
    repo::require_member(&state.db, household_id, user_id).await?;
    if matches!(body.name.as_deref(), Some(n) if n.trim().is_empty()) {
        return Err(AppError::validation("Household name must not be empty"));
    }
    validate_envelope(body.family_size, body.weekly_budget)?;

    let household = repo::update(
        &state.db,
        household_id,
        body.name.as_deref().map(str::trim),
        body.family_size,
        body.weekly_budget,
    )
    .await?
    .ok_or_else(|| AppError::not_found("Household not found"))?;
    Ok(Json(household))
}

#[instrument(skip(state))]
pub async fn get_household(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
) -> Result<Json<Household>, AppError> {
    repo::require_member(&state.db, household_id, user_id).await?;
    let household = repo::find(&state.db, household_id)
        .await?
        .ok_or_else(|| AppError::not_found("Household not found"))?;
    Ok(Json(household))
}

#[instrument(skip(state))]
pub async fn list_households(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Household>>, AppError> {
    let households = repo::list_for_user(&state.db, user_id).await?;
    Ok(Json(households))
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
) -> Result<Json<Vec<MemberWithProfile>>, AppError> {
    repo::require_member(&state.db, household_id, user_id).await?;
    let members = repo::members_with_profiles(&state.db, household_id).await?;
    Ok(Json(members))
}

/// DELETE /households/:id/members/:user_id — actor must be an owner and may
/// not remove themselves. Removing the last owner is not prevented.
#[instrument(skip(state))]
pub async fn remove_member(
    State(state): State<AppState>,
    AuthUser(actor_id): AuthUser,
    Path((household_id, target_user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let role = repo::require_member(&state.db, household_id, actor_id).await?;
    if role != "owner" {
        return Err(AppError::Forbidden(
            "Only owners can remove members".into(),
        ));
    }
    if target_user_id == actor_id {
        return Err(AppError::validation("You cannot remove yourself"));
    }

    let removed = repo::remove_member(&state.db, household_id, target_user_id).await?;
    if removed == 0 {
        return Err(AppError::not_found("Member not found"));
    }
    info!(household_id = %household_id, removed = %target_user_id, "member removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /households/:id/invitations — snapshots the household name so a
/// later rename leaves pending invitation text untouched; email is stored
/// lowercased.
#[instrument(skip(state, body))]
pub async fn create_invitation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
    Json(body): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<HouseholdInvitation>), AppError> {
    repo::require_member(&state.db, household_id, user_id).await?;

    let email = body.email.trim().to_lowercase();
    if !auth::is_valid_email(&email) {
        return Err(AppError::validation("Invalid email address"));
    }

    let household = repo::find(&state.db, household_id)
        .await?
        .ok_or_else(|| AppError::not_found("Household not found"))?;

    let invitation =
        repo::create_invitation(&state.db, household_id, &household.name, &email, user_id).await?;
    info!(household_id = %household_id, email = %email, "invitation created");
    Ok((StatusCode::CREATED, Json(invitation)))
}

#[instrument(skip(state))]
pub async fn list_household_invitations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
) -> Result<Json<Vec<HouseholdInvitation>>, AppError> {
    repo::require_member(&state.db, household_id, user_id).await?;
    let invitations = repo::pending_invitations_for_household(&state.db, household_id).await?;
    Ok(Json(invitations))
}

/// GET /invitations/pending — pending invitations addressed to the caller's
/// email, matched case-insensitively.
#[instrument(skip(state))]
pub async fn pending_invitations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<HouseholdInvitation>>, AppError> {
    let user = auth::repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".into()))?;
    let invitations = repo::pending_invitations_for_email(&state.db, &user.email).await?;
    Ok(Json(invitations))
}

/// POST /invitations/:id/accept
///
/// The steps run in order but deliberately not in one transaction: if the
/// final status flip fails, the membership row already grants access, and
/// membership is what every other check consults. Re-accepting is a no-op
/// thanks to the unique membership target.
#[instrument(skip(state))]
pub async fn accept_invitation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<HouseholdInvitation>, AppError> {
    let invitation = repo::find_invitation(&state.db, invitation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invitation not found"))?;

    // A missing profile row must not block joining a household.
    let user = auth::repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".into()))?;
    let fallback_name = user.email.split('@').next().unwrap_or_default();
    profiles::repo::ensure_exists(&state.db, user_id, fallback_name).await?;

    repo::insert_membership_if_absent(&state.db, invitation.household_id, user_id, "member")
        .await?;

    profiles::repo::set_active_if_unset(&state.db, user_id, invitation.household_id).await?;

    if repo::set_invitation_status(&state.db, invitation_id, "accepted").await? == 0 {
        warn!(invitation_id = %invitation_id, "membership created but status flip found no row");
    }

    let updated = repo::find_invitation(&state.db, invitation_id)
        .await?
        .unwrap_or(invitation);
    info!(invitation_id = %invitation_id, user_id = %user_id, "invitation accepted");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn decline_invitation(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(invitation_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if repo::set_invitation_status(&state.db, invitation_id, "declined").await? == 0 {
        return Err(AppError::not_found("Invitation not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /invitations/:id — hard delete, an owner rescinding a still-pending
/// invite. No status check; deleting a terminal invitation is allowed.
#[instrument(skip(state))]
pub async fn cancel_invitation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(invitation_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let invitation = repo::find_invitation(&state.db, invitation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invitation not found"))?;
    repo::require_member(&state.db, invitation.household_id, user_id).await?;

    repo::delete_invitation(&state.db, invitation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

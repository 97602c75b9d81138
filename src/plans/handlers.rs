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
use crate::week;

use super::dto::{validate_document, SavePlanRequest};
use super::repo::{self, MealPlanRow};

/// GET /households/:id/plans/:week — `null`, not 404, when the week has no
/// plan yet. Any date in the week resolves to its Monday key.
#[instrument(skip(state))]
pub async fn get_plan_for_week(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((household_id, week)): Path<(Uuid, String)>,
) -> Result<Json<Option<MealPlanRow>>, AppError> {
    households::repo::require_member(&state.db, household_id, user_id).await?;
    let week_start = week::week_start(week::parse_week_key(&week)?);
    let plan = repo::get_for_week(&state.db, household_id, week_start).await?;
    Ok(Json(plan))
}

/// PUT /households/:id/plans/:week — upsert; a second save for the same week
/// replaces the first.
#[instrument(skip(state, body))]
pub async fn save_plan_for_week(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((household_id, week)): Path<(Uuid, String)>,
    Json(body): Json<SavePlanRequest>,
) -> Result<Json<MealPlanRow>, AppError> {
    households::repo::require_member(&state.db, household_id, user_id).await?;
    let week_start = week::week_start(week::parse_week_key(&week)?);
    // A malformed body here is the client's fault, not the model's.
    validate_document(&body.plan).map_err(AppError::Validation)?;
    let saved = repo::save_for_week(&state.db, &body.plan, household_id, user_id, week_start).await?;
    info!(household_id = %household_id, week = %week::week_key(week_start), "meal plan saved");
    Ok(Json(saved))
}

#[instrument(skip(state))]
pub async fn plan_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
) -> Result<Json<Vec<MealPlanRow>>, AppError> {
    households::repo::require_member(&state.db, household_id, user_id).await?;
    let rows = repo::history(&state.db, household_id).await?;
    Ok(Json(rows))
}

/// Legacy rows predate household scoping, so membership cannot gate them;
/// only the user who saved such a row may delete it.
fn authorize_legacy_delete(plan: &MealPlanRow, user_id: Uuid) -> Result<(), AppError> {
    if plan.created_by != Some(user_id) {
        return Err(AppError::Forbidden(
            "You cannot delete this meal plan".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let plan = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Meal plan not found"))?;
    match plan.household_id {
        Some(household_id) => {
            households::repo::require_member(&state.db, household_id, user_id).await?;
        }
        None => authorize_legacy_delete(&plan, user_id)?,
    }
    repo::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::dto::sample_document;
    use sqlx::types::Json as SqlxJson;
    use time::OffsetDateTime;

    fn legacy_row(created_by: Option<Uuid>) -> MealPlanRow {
        MealPlanRow {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            family_size: 4,
            weekly_budget: 300.0,
            household_id: None,
            created_by,
            week_start_date: None,
            plan: SqlxJson(sample_document()),
        }
    }

    #[test]
    fn legacy_plan_delete_requires_the_creator() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let plan = legacy_row(Some(owner));

        authorize_legacy_delete(&plan, owner).expect("creator may delete");
        let err = authorize_legacy_delete(&plan, stranger).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn legacy_plan_without_creator_is_undeletable() {
        let plan = legacy_row(None);
        let err = authorize_legacy_delete(&plan, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
